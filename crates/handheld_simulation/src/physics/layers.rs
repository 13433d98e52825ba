//! Collision layers
//!
//! Битовые маски слоёв, общие для host physics и ray queries.
//!
//! ## Layers:
//! - `LAYER_WORLD` (1): static geometry, doors, triggers, props
//! - `LAYER_ACTORS` (2): creatures (damageable)
//! - `LAYER_EQUIPMENT` (4): pooled hand-held items
//! - `LAYER_UI` (8): floating UI panels
//! - `LAYER_PLAYER_BODY` (16): player capsule/hands (never hit by own pointer)

// ============================================================================
// Layers
// ============================================================================

pub const LAYER_WORLD: u32 = 0b1;

pub const LAYER_ACTORS: u32 = 0b10;

pub const LAYER_EQUIPMENT: u32 = 0b100;

pub const LAYER_UI: u32 = 0b1000;

pub const LAYER_PLAYER_BODY: u32 = 0b1_0000;

// ============================================================================
// Masks
// ============================================================================

/// World-hint pointer: everything interactive except the player body and UI
pub const MASK_POINTER_WORLD: u32 = LAYER_WORLD | LAYER_ACTORS | LAYER_EQUIPMENT;

/// UI pointer: UI panels only
pub const MASK_POINTER_UI: u32 = LAYER_UI;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_world_mask_excludes_player_and_ui() {
        assert_eq!(MASK_POINTER_WORLD & LAYER_PLAYER_BODY, 0);
        assert_eq!(MASK_POINTER_WORLD & LAYER_UI, 0);
        assert_ne!(MASK_POINTER_WORLD & LAYER_EQUIPMENT, 0);
    }
}
