//! Equipment events
//!
//! # Inputs (host → simulation)
//! - `ItemEquipped` / `ItemUnequipped` — inventory equip state (player only)
//! - `ForceAttachRequest` — attach an equipped item to a hand right now
//! - `HighlightRequest` — outline toggle
//!
//! # Outputs (simulation → host)
//! - `EquipmentAttached` — item attached (held or floating) + material tint
//! - `EquipmentDetached` — item released into the world or stowed

use bevy::prelude::*;

use crate::item_catalog::InventoryItem;

/// Inventory reports an item equipped on `owner`
#[derive(Event, Clone, Debug)]
pub struct ItemEquipped {
    pub item: InventoryItem,
    pub owner: Entity,
}

/// Inventory reports an item unequipped from `owner`
#[derive(Event, Clone, Debug)]
pub struct ItemUnequipped {
    pub item: InventoryItem,
    pub owner: Entity,
}

/// Attach an equipped item to `hand` (pointer select, host grab interactor)
///
/// # Flow
/// 1. Item уже в другой руке → снять с неё
/// 2. Pickup по attachment policy
#[derive(Event, Clone, Copy, Debug)]
pub struct ForceAttachRequest {
    pub item: Entity,
    pub hand: Entity,
}

#[derive(Event, Clone, Copy, Debug)]
pub struct HighlightRequest {
    pub item: Entity,
    pub enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachMode {
    Held,
    Floating,
}

#[derive(Event, Clone, Debug, PartialEq)]
pub struct EquipmentAttached {
    pub item: Entity,
    pub hand: Entity,
    pub mode: AttachMode,
    /// RGB tint для metal mesh (из material tag)
    pub tint: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetachReason {
    /// Grip released, item simulated dynamically
    Released,
    /// Returned to the pool
    Unequipped,
}

#[derive(Event, Clone, Debug, PartialEq)]
pub struct EquipmentDetached {
    pub item: Entity,
    pub hand: Option<Entity>,
    pub reason: DetachReason,
}
