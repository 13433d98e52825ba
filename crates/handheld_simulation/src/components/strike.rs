//! Strike bookkeeping: velocity sample, cooldown, sub-pieces

use bevy::prelude::*;

use crate::feedback::material::MaterialZone;

/// Velocity of a striking body sampled at the last physics tick boundary
///
/// Contacts are evaluated against this sample, not the post-contact velocity
/// (после контакта rapier уже погасил скорость).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct PreContactVelocity {
    pub linear: Vec3,
    pub angular: Vec3,
    /// World-space pose at sample time
    pub center: Vec3,
    pub rotation: Quat,
    /// Physics frame the sample was taken on
    pub frame: u64,
}

impl PreContactVelocity {
    /// Velocity of a point rigidly attached to the body: v + ω × r
    pub fn point_velocity(&self, point: Vec3) -> Vec3 {
        self.linear + self.angular.cross(point - self.center)
    }
}

/// Per-body hit cooldown (physics frames)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct StrikeCooldown {
    pub last_accepted: Option<u64>,
}

impl StrikeCooldown {
    pub fn is_ready(&self, frame: u64, window: u64) -> bool {
        match self.last_accepted {
            Some(last) => frame.saturating_sub(last) >= window,
            None => true,
        }
    }

    pub fn mark(&mut self, frame: u64) {
        self.last_accepted = Some(frame);
    }
}

/// Detached rigid sub-piece of a weapon (flail ball, ...)
///
/// Своя скорость и свой cooldown; haptics идут в руку, держащую `weapon`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(Transform, PreContactVelocity, StrikeCooldown)]
pub struct StrikingPiece {
    pub weapon: Entity,
    /// Material of the piece itself (у шара цепа нет sub-colliders)
    pub zone: MaterialZone,
}
