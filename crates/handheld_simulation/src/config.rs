//! Runtime tuning (RON-loadable).
//!
//! Every field has a default, so a config file only lists what it overrides:
//!
//! ```ron
//! (
//!     impact: (min_strike_speed: 1.5),
//!     pointer: (world_ray_distance: 50.0),
//! )
//! ```

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Resource, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandheldConfig {
    pub impact: ImpactConfig,
    pub audio: AudioConfig,
    pub pointer: PointerConfig,
    pub ui: UiConfig,
}

impl HandheldConfig {
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(source)?)
    }
}

/// Strike qualification
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactConfig {
    /// Minimum pre-contact linear speed (m/s)
    pub min_strike_speed: f32,
    /// Physics frames between accepted hits of one striking body
    pub cooldown_frames: u64,
    /// Ray origin offset along the contact normal (m)
    pub revalidation_offset: f32,
    /// Ray length for hit confirmation (m)
    pub revalidation_distance: f32,
    /// Haptic intensity at `min_strike_speed`
    pub haptic_min: f32,
    /// Haptic intensity at `AudioConfig::max_speed` and above
    pub haptic_max: f32,
    /// Spawn a particle on strikes against invulnerable targets
    pub no_damage_particle: bool,
}

impl Default for ImpactConfig {
    fn default() -> Self {
        Self {
            min_strike_speed: 1.0,
            cooldown_frames: MIN_COOLDOWN_FRAMES,
            revalidation_offset: 0.05,
            revalidation_distance: 0.3,
            haptic_min: 0.2,
            haptic_max: 1.0,
            no_damage_particle: true,
        }
    }
}

/// Accepted hits of one body are at least this many frames apart
pub const MIN_COOLDOWN_FRAMES: u64 = 3;

impl ImpactConfig {
    /// Effective cooldown window (config values below the floor are raised)
    pub fn cooldown_window(&self) -> u64 {
        self.cooldown_frames.max(MIN_COOLDOWN_FRAMES)
    }
}

/// Impact audio volume curve
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Speed mapped to volume 0
    pub min_audible_speed: f32,
    /// Speed mapped to volume 1
    pub max_speed: f32,
    /// Extra multiplier for the hard pool
    pub hard_volume_scale: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            min_audible_speed: 1.0,
            max_speed: 12.0,
            hard_volume_scale: 0.5,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PointerConfig {
    pub world_ray_distance: f32,
    pub ui_ray_distance: f32,
    /// Grip within this distance of a floating item picks it up
    pub float_grab_radius: f32,
    /// Float anchor relative to the hand (hand-local, metres)
    pub float_anchor_offset: [f32; 3],
}

impl PointerConfig {
    pub fn float_anchor(&self) -> Transform {
        Transform::from_translation(Vec3::from_array(self.float_anchor_offset))
    }
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            world_ray_distance: 75.0,
            ui_ray_distance: 100.0,
            float_grab_radius: 0.3,
            float_anchor_offset: [0.0, 0.1, -0.15],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Distance of the floating UI panel in front of the head camera (m)
    pub panel_distance: f32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { panel_distance: 3.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = HandheldConfig::from_ron("(impact: (min_strike_speed: 2.5), ui: (panel_distance: 4.0))")
            .expect("valid config");

        assert_eq!(config.impact.min_strike_speed, 2.5);
        assert_eq!(config.impact.cooldown_frames, 3);
        assert_eq!(config.ui.panel_distance, 4.0);
        assert_eq!(config.pointer, PointerConfig::default());
    }

    #[test]
    fn test_cooldown_window_has_floor() {
        let config = HandheldConfig::from_ron("(impact: (cooldown_frames: 1))").expect("valid config");
        assert_eq!(config.impact.cooldown_window(), MIN_COOLDOWN_FRAMES);

        let config = HandheldConfig::from_ron("(impact: (cooldown_frames: 6))").expect("valid config");
        assert_eq!(config.impact.cooldown_window(), 6);
    }

    #[test]
    fn test_empty_ron_is_default() {
        let config = HandheldConfig::from_ron("()").expect("valid config");
        assert_eq!(config, HandheldConfig::default());
    }

    #[test]
    fn test_malformed_ron_is_parse_error() {
        let result = HandheldConfig::from_ron("(impact: (min_strike_speed: \"fast\"))");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
