//! Equipment module: pooled hand-held items
//!
//! # Architecture
//!
//! **Events → Systems flow:**
//! - Inventory шлёт `ItemEquipped` / `ItemUnequipped` (только player)
//! - Registry выбирает pooled instance, attach/stow меняют его state
//! - Presentation получает `EquipmentAttached` / `EquipmentDetached`
//!
//! **Instance lifecycle:**
//! - Startup → pool pre-spawned (`initialize_equipment_pool`), затем subscribe
//! - Equip → held (grip pressed) или floating у руки
//! - Grip released → loose (dynamic), hand velocity → impulse
//! - Unequip → stowed, instance снова idle

use bevy::prelude::*;

pub mod attach;
pub mod events;
pub mod registry;
pub mod subscription;
pub mod systems;


// Re-exports
pub use events::*;
pub use registry::{EquipmentRegistry, PoolSlot};
pub use subscription::{subscribe_inventory, unsubscribe_inventory_on_exit, InventorySubscription};
pub use systems::*;

use crate::HandheldSet;

/// Equipment plugin (pool + attachment lifecycle)
pub struct EquipmentPlugin;

impl Plugin for EquipmentPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<EquipmentRegistry>()
            .init_resource::<InventorySubscription>()
            // Events
            .add_event::<ItemEquipped>()
            .add_event::<ItemUnequipped>()
            .add_event::<ForceAttachRequest>()
            .add_event::<HighlightRequest>()
            .add_event::<EquipmentAttached>()
            .add_event::<EquipmentDetached>()
            // Pool до подписки: equip events до инициализации отбрасываются
            .add_systems(Startup, (initialize_equipment_pool, subscribe_inventory).chain())
            .add_systems(
                Update,
                (
                    process_item_equipped,
                    process_item_unequipped,
                    release_on_grip_up,
                    pick_up_floating_items,
                    process_force_attach,
                    process_highlight_requests,
                    follow_attached_items,
                )
                    .chain()
                    .in_set(HandheldSet::Equipment),
            )
            .add_systems(Last, unsubscribe_inventory_on_exit);
    }
}
