//! ECS Components для hand-held simulation
//!
//! Организация по доменам:
//! - hand: tracked controllers (Hand, HandSide, HandInput)
//! - equipment: pooled equipment instances (EquipmentItem, AttachState, AttachmentPolicy)
//! - world: struck targets и scene markers (Health, Door, ActionTrigger, UiSurface, ...)
//! - strike: per-body impact bookkeeping (PreContactVelocity, StrikeCooldown, StrikingPiece)

pub mod equipment;
pub mod hand;
pub mod strike;
pub mod world;

// Re-exports для удобного импорта
pub use equipment::*;
pub use hand::*;
pub use strike::*;
pub use world::*;
