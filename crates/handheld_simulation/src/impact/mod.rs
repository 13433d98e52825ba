//! Impact module: physical strikes → gameplay events
//!
//! Host physics сообщает о контактах (`StrikeContact`); resolver решает,
//! был ли это настоящий удар и что он сделал с целью.
//!
//! Все системы в FixedUpdate (physics tick):
//! 1. `advance_physics_frame` — frame counter для cooldown'ов
//! 2. `refresh_ray_proxies` — proxy backend видит актуальные позиции
//! 3. `resolve_impacts` — cooldown → speed → ray → classify → outcome
//! 4. `sample_strike_velocities` — sample для контактов следующего тика

use bevy::prelude::*;

pub mod classify;
pub mod direction;
pub mod events;
pub mod resolver;

pub use classify::TargetClass;
pub use direction::StrikeDirection;
pub use events::*;
pub use resolver::{confirm_hit, haptic_intensity, resolve_impacts, ImpactWriters};

use crate::physics::{advance_physics_frame, refresh_ray_proxies, sample_strike_velocities, PhysicsFrame};

pub struct ImpactPlugin;

impl Plugin for ImpactPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhysicsFrame>()
            .add_event::<StrikeContact>()
            .add_event::<ImpactResolved>()
            .add_event::<DamageDealt>()
            .add_event::<DoorBashed>()
            .add_event::<TriggerActivated>()
            .add_systems(
                FixedUpdate,
                (
                    advance_physics_frame,
                    refresh_ray_proxies,
                    resolve_impacts,
                    sample_strike_velocities,
                )
                    .chain(),
            );
    }
}
