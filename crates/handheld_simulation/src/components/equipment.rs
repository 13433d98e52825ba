//! Equipment компоненты: pooled hand-held item и его attachment state machine
//!
//! # Lifecycle
//!
//! ```text
//! Stowed ──equip──▶ Held / Floating ──release──▶ Loose ──grab──▶ Held
//!    ▲                                                      │
//!    └──────────────────────unequip─────────────────────────┘
//! ```
//!
//! Экземпляры создаются один раз при старте (pool) и никогда не деспавнятся.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::hand::HandSide;
use crate::components::strike::{PreContactVelocity, StrikeCooldown};
use crate::feedback::material::MaterialZones;
use crate::item_catalog::{EquipmentKind, ItemUid, KindDefinition, MaterialTag};

/// Where a held item takes its pose from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HeldAnchor {
    /// Hand pose × grip offset
    Hand,
    /// Player root pose × offset captured at pickup
    PlayerRoot { offset: Transform },
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AttachState {
    /// Idle in pool (hidden, no physics)
    #[default]
    Stowed,
    /// Rigidly attached to a hand
    Held { hand: Entity, anchor: HeldAnchor },
    /// Parked at the hand's float anchor, waiting for pickup
    Floating { hand: Entity },
    /// Released into the world, simulated dynamically
    Loose,
}

impl AttachState {
    /// Hand this item is attached to (held or floating)
    pub fn hand(&self) -> Option<Entity> {
        match self {
            AttachState::Held { hand, .. } | AttachState::Floating { hand } => Some(*hand),
            AttachState::Stowed | AttachState::Loose => None,
        }
    }

    pub fn is_held(&self) -> bool {
        matches!(self, AttachState::Held { .. })
    }
}

/// How an item behaves when picked up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttachmentPolicy {
    /// false → item tracks the player root instead of the hand
    pub parent_to_hand: bool,
    /// false → kinematic flag is explicitly cleared on pickup
    pub kinematic_on_attach: bool,
    /// Item pose relative to the hand
    pub grip_offset: Transform,
}

impl Default for AttachmentPolicy {
    fn default() -> Self {
        Self {
            parent_to_hand: true,
            kinematic_on_attach: true,
            grip_offset: Transform::IDENTITY,
        }
    }
}

/// Pooled equipment instance
///
/// Инварианты:
/// - `bound_item.is_some()` ⇔ instance в equipped set registry
/// - `state != Stowed` ⇒ `bound_item.is_some()`
#[derive(Component, Debug, Clone)]
#[require(Transform, RigidBody = RigidBody::KinematicPositionBased, Velocity, ExternalImpulse, PreContactVelocity, StrikeCooldown)]
pub struct EquipmentItem {
    pub kind: EquipmentKind,
    pub bound_item: Option<ItemUid>,
    pub hand_side: Option<HandSide>,
    pub state: AttachState,
    pub highlighted: bool,
    pub zones: MaterialZones,
    pub policy: AttachmentPolicy,
    pub material: MaterialTag,
    pub base_damage: u32,
    pub mass: f32,
}

impl EquipmentItem {
    pub fn from_definition(definition: &KindDefinition) -> Self {
        Self {
            kind: definition.kind.clone(),
            bound_item: None,
            hand_side: None,
            state: AttachState::Stowed,
            highlighted: false,
            zones: definition.zones.clone(),
            policy: definition.policy,
            material: MaterialTag::None,
            base_damage: definition.base_damage,
            mass: definition.mass,
        }
    }

    pub fn is_equipped(&self) -> bool {
        self.bound_item.is_some()
    }

    /// Returns `true` if the outline state changed
    pub fn highlight(&mut self) -> bool {
        let changed = !self.highlighted;
        self.highlighted = true;
        changed
    }

    /// Returns `true` if the outline state changed
    pub fn unhighlight(&mut self) -> bool {
        let changed = self.highlighted;
        self.highlighted = false;
        changed
    }
}

/// Resolved model path of a pooled instance (для presentation layer)
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct EquipmentAsset {
    pub path: String,
}
