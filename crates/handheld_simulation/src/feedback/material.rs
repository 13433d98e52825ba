//! Material zones: hard/soft sub-colliders of an equipment item
//!
//! Contact point (item-local) → ближайшая зона → audio pool + volume.
//!
//! Правило выбора:
//! 1. Нет зон → нет material audio
//! 2. Присутствует только один тип зоны → он
//! 3. Иначе минимальная дистанция от точки до bounds каждой зоны

use bevy::math::bounding::Aabb3d;
use bevy::prelude::*;

use crate::config::AudioConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum MaterialZone {
    /// Metal blade/head/plate
    Hard,
    /// Wood/leather grip, shaft
    Soft,
}

/// Named hit-detection sub-collider (item-local bounds)
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneCollider {
    pub name: String,
    pub zone: MaterialZone,
    pub bounds: Aabb3d,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialZones {
    colliders: Vec<ZoneCollider>,
}

impl MaterialZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zone(mut self, name: &str, zone: MaterialZone, bounds: Aabb3d) -> Self {
        self.colliders.push(ZoneCollider {
            name: name.to_string(),
            zone,
            bounds,
        });
        self
    }

    /// Blade/head of length `reach` in front of (−Z) a 20 cm soft grip
    pub fn blade_and_grip(reach: f32) -> Self {
        const GRIP_HALF_LENGTH: f32 = 0.1;
        let half_reach = reach * 0.5;

        Self::new()
            .with_zone(
                "blade",
                MaterialZone::Hard,
                Aabb3d::new(
                    Vec3::new(0.0, 0.0, -(GRIP_HALF_LENGTH + half_reach)),
                    Vec3::new(0.02, 0.04, half_reach),
                ),
            )
            .with_zone(
                "grip",
                MaterialZone::Soft,
                Aabb3d::new(Vec3::ZERO, Vec3::new(0.02, 0.02, GRIP_HALF_LENGTH)),
            )
    }

    pub fn colliders(&self) -> &[ZoneCollider] {
        &self.colliders
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn has(&self, zone: MaterialZone) -> bool {
        self.colliders.iter().any(|c| c.zone == zone)
    }

    /// Zone of a contact point given in item-local space
    pub fn classify(&self, local_point: Vec3) -> Option<MaterialZone> {
        match (self.has(MaterialZone::Hard), self.has(MaterialZone::Soft)) {
            (false, false) => None,
            (true, false) => Some(MaterialZone::Hard),
            (false, true) => Some(MaterialZone::Soft),
            (true, true) => self
                .colliders
                .iter()
                .map(|c| (c.zone, distance_to_bounds(&c.bounds, local_point)))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(zone, _)| zone),
        }
    }
}

fn distance_to_bounds(bounds: &Aabb3d, point: Vec3) -> f32 {
    Vec3::from(bounds.closest_point(point)).distance(point)
}

/// Volume for an impact at `speed` (m/s)
///
/// inverse-lerp между min_audible_speed и max_speed, clamp [0, 1];
/// hard pool дополнительно ослаблен `hard_volume_scale`.
pub fn impact_volume(speed: f32, zone: MaterialZone, audio: &AudioConfig) -> f32 {
    let range = audio.max_speed - audio.min_audible_speed;
    let t = if range <= f32::EPSILON {
        if speed >= audio.max_speed { 1.0 } else { 0.0 }
    } else {
        ((speed - audio.min_audible_speed) / range).clamp(0.0, 1.0)
    };

    match zone {
        MaterialZone::Hard => t * audio.hard_volume_scale,
        MaterialZone::Soft => t,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_single_zone_type_wins_regardless_of_distance() {
        let zones = MaterialZones::new().with_zone(
            "shaft",
            MaterialZone::Soft,
            Aabb3d::new(Vec3::ZERO, Vec3::splat(0.05)),
        );

        assert_eq!(zones.classify(Vec3::new(10.0, 0.0, 0.0)), Some(MaterialZone::Soft));
    }

    #[test]
    fn test_nearest_zone_wins() {
        let zones = MaterialZones::blade_and_grip(0.8);

        // Кончик клинка
        assert_eq!(zones.classify(Vec3::new(0.0, 0.0, -0.85)), Some(MaterialZone::Hard));
        // Навершие рукояти
        assert_eq!(zones.classify(Vec3::new(0.0, 0.0, 0.12)), Some(MaterialZone::Soft));
    }

    #[test]
    fn test_no_zones_no_classification() {
        assert_eq!(MaterialZones::new().classify(Vec3::ZERO), None);
    }

    #[test]
    fn test_volume_curve() {
        let audio = AudioConfig {
            min_audible_speed: 2.0,
            max_speed: 12.0,
            hard_volume_scale: 0.5,
        };

        assert_relative_eq!(impact_volume(1.0, MaterialZone::Soft, &audio), 0.0);
        assert_relative_eq!(impact_volume(7.0, MaterialZone::Soft, &audio), 0.5);
        assert_relative_eq!(impact_volume(50.0, MaterialZone::Soft, &audio), 1.0);
        assert_relative_eq!(impact_volume(7.0, MaterialZone::Hard, &audio), 0.25);
    }
}
