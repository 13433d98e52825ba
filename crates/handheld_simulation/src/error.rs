//! Error types.
//!
//! Registry operations return [`EquipError`]; systems log it with the level
//! from [`EquipError::severity`] and carry on. Only pool exhaustion and
//! unequip inconsistencies are real defects.

use thiserror::Error;

use crate::item_catalog::{EquipmentKind, ItemUid};
use crate::logger::LogLevel;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EquipError {
    /// Item is not worn in a hand slot; only hand-held items get a physical body.
    #[error("item {uid:?} is not held in a hand slot")]
    NotHandHeld { uid: ItemUid },

    /// Artifact without an ordinary equivalent kind.
    #[error("item {uid:?} has no equivalent equipment kind")]
    UnmappedKind { uid: ItemUid },

    /// Kind was never pooled (unknown kind or its asset failed to resolve).
    #[error("no pooled instances for kind {kind:?}")]
    NoPool { kind: EquipmentKind },

    /// Every pooled instance of the kind is already bound.
    #[error("pool for kind {kind:?} exhausted ({pooled} instances, all equipped)")]
    PoolExhausted { kind: EquipmentKind, pooled: usize },

    /// The same inventory item is already bound to a pooled instance.
    #[error("item {uid:?} is already equipped")]
    AlreadyBound { uid: ItemUid },

    /// Unequip for an item that no pooled instance is bound to.
    #[error("item {uid:?} of kind {kind:?} is not equipped")]
    NotEquipped { uid: ItemUid, kind: EquipmentKind },
}

impl EquipError {
    /// Log level for this failure.
    ///
    /// - Debug: expected filtering (body armour, rings, ...)
    /// - Warning: catalog/asset gaps, duplicated equip events
    /// - Error: pool-sizing defect, registry out of sync with the inventory
    pub fn severity(&self) -> LogLevel {
        match self {
            EquipError::NotHandHeld { .. } => LogLevel::Debug,
            EquipError::UnmappedKind { .. }
            | EquipError::NoPool { .. }
            | EquipError::AlreadyBound { .. } => LogLevel::Warning,
            EquipError::PoolExhausted { .. } | EquipError::NotEquipped { .. } => LogLevel::Error,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
