//! Inventory event subscription
//!
//! Equip/unequip events обрабатываются только пока подписка активна
//! (после инициализации pool'а, до shutdown). Иначе отбрасываются.

use bevy::prelude::*;

use crate::logger::log;

#[derive(Resource, Debug, Default)]
pub struct InventorySubscription {
    active: bool,
}

impl InventorySubscription {
    /// Returns `true` if the subscription was inactive
    pub fn subscribe(&mut self) -> bool {
        let changed = !self.active;
        self.active = true;
        changed
    }

    /// Returns `true` if the subscription was active
    pub fn unsubscribe(&mut self) -> bool {
        let changed = self.active;
        self.active = false;
        changed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// System (Startup, после pool init)
pub fn subscribe_inventory(mut subscription: ResMut<InventorySubscription>) {
    if subscription.subscribe() {
        log("📦 Inventory events: subscribed");
    }
}

/// System (Last): отписка на выходе из приложения
pub fn unsubscribe_inventory_on_exit(
    mut exit_events: EventReader<AppExit>,
    mut subscription: ResMut<InventorySubscription>,
) {
    if exit_events.read().next().is_some() && subscription.unsubscribe() {
        log("📦 Inventory events: unsubscribed");
    }
}
