//! World компоненты: то, по чему бьёт оружие, и scene markers для pointer'а

use bevy::prelude::*;

/// Player root marker (equip events фильтруются по нему)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct Player;

/// Head camera (strike direction считается в её пространстве)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct HeadCamera;

/// Здоровье цели
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    /// Returns damage actually applied
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_sub(amount);
        before - self.current
    }
}

/// Marker: цель принимает удары, но не теряет здоровье
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Invulnerable;

/// Door that a strong enough strike can bash open
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Door {
    pub open: bool,
    /// Magically held / barred doors ignore strikes
    pub locked_magically: bool,
}

impl Door {
    pub fn will_be_bashed(&self) -> bool {
        !self.open && !self.locked_magically
    }
}

/// Switch/lever/button activated by hitting it
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct ActionTrigger {
    pub enabled: bool,
    pub activations: u32,
}

impl Default for ActionTrigger {
    fn default() -> Self {
        Self {
            enabled: true,
            activations: 0,
        }
    }
}

/// Entity has a rendered mesh (outline possible)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct VisibleMesh;

/// Level geometry (walls, floors), never hint-highlighted
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct StaticScenery;

/// Interactive UI plane
///
/// Local pointer coordinate = hit point in the surface's local frame (x, y).
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Transform)]
pub struct UiSurface;
