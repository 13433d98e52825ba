//! Feedback: presentation requests и material classification
//!
//! Симуляция ничего не рисует и не играет, она шлёт события,
//! host presentation layer их исполняет:
//! - `HapticPulse` → controller vibration
//! - `PlayAudioAt` → one-shot 3D sound
//! - `SpawnParticle` → VFX
//! - `SetWeaponAnimation` → discrete animation state (no blending)
//! - `OutlineChanged` → outline shader toggle

use bevy::prelude::*;

pub mod audio;
pub mod material;

pub use audio::ImpactAudio;
pub use material::{impact_volume, MaterialZone, MaterialZones, ZoneCollider};

use crate::components::HandSide;
use crate::impact::StrikeDirection;

#[derive(Event, Debug, Clone, PartialEq)]
pub struct HapticPulse {
    pub hand: Entity,
    pub side: HandSide,
    /// 0..1
    pub intensity: f32,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayAudioAt {
    pub point: Vec3,
    pub clip: String,
    pub volume: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleEffect {
    /// Искры от удара по неуязвимой цели
    NoDamageSpark,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SpawnParticle {
    pub point: Vec3,
    pub normal: Vec3,
    pub effect: ParticleEffect,
}

#[derive(Event, Debug, Clone, PartialEq)]
pub struct SetWeaponAnimation {
    pub hand: Entity,
    pub direction: StrikeDirection,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutlineChanged {
    pub target: Entity,
    pub enabled: bool,
}

/// Регистрирует presentation events
pub struct FeedbackPlugin;

impl Plugin for FeedbackPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ImpactAudio>()
            .add_event::<HapticPulse>()
            .add_event::<PlayAudioAt>()
            .add_event::<SpawnParticle>()
            .add_event::<SetWeaponAnimation>()
            .add_event::<OutlineChanged>();
    }
}
