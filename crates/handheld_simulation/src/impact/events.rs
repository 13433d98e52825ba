//! Impact events
//!
//! **Input:** `StrikeContact` — collision callback от host physics
//! **Output:** `ImpactResolved` (любой принятый удар) + специализированные
//! `DamageDealt` / `DoorBashed` / `TriggerActivated`

use bevy::prelude::*;

use crate::impact::classify::TargetClass;

/// Contact of a collision manifold
///
/// `normal` смотрит наружу из поверхности ударенного объекта (к striker'у).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    pub point: Vec3,
    pub normal: Vec3,
}

/// Collision reported by the host on a striking body
#[derive(Event, Debug, Clone)]
pub struct StrikeContact {
    /// Equipment item or `StrikingPiece`
    pub striker: Entity,
    pub struck: Entity,
    /// Collision layer of the struck collider
    pub struck_layer: u32,
    pub contacts: Vec<ContactPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactOutcome {
    Damaged { amount: u32, killed: bool },
    Bashed,
    Activated,
    /// Damageable, но неуязвим
    NoDamage,
}

impl ImpactOutcome {
    pub fn changed_state(&self) -> bool {
        !matches!(self, ImpactOutcome::NoDamage)
    }
}

/// Accepted strike (at most one per striking body per cooldown window)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct ImpactResolved {
    pub striker: Entity,
    /// Equipment item the striker belongs to (== striker for whole weapons)
    pub weapon: Entity,
    pub target: Entity,
    pub class: TargetClass,
    pub outcome: ImpactOutcome,
    pub point: Vec3,
    pub speed: f32,
    pub frame: u64,
}

/// Событие: урон нанесен
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorBashed {
    pub door: Entity,
    pub striker: Entity,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerActivated {
    pub trigger: Entity,
    pub striker: Entity,
}
