//! Handheld Simulation Core
//!
//! ECS-симуляция hand-held equipment для VR на Bevy 0.16 (headless)
//!
//! HYBRID ARCHITECTURE:
//! - ECS = rules (equipment pool, attachment, strike qualification, pointer modes)
//! - Host engine = physics solver, rendering, audio, inventory UI
//!
//! Host пишет позы рук/камеры и input, шлёт inventory/contact/window events;
//! симуляция отвечает presentation events (haptics, audio, outline, UI pointer).

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod assets;
pub mod components;
pub mod config;
pub mod equipment;
pub mod error;
pub mod feedback;
pub mod impact;
pub mod item_catalog;
pub mod logger;
pub mod physics;
pub mod pointer;
pub mod ui;

// Re-export для удобства
pub use assets::AssetManifest;
pub use components::*;
pub use config::HandheldConfig;
pub use equipment::{EquipmentPlugin, EquipmentRegistry};
pub use error::{ConfigError, EquipError};
pub use feedback::FeedbackPlugin;
pub use impact::ImpactPlugin;
pub use item_catalog::{EquipmentKind, InventoryItem, ItemCatalog, ItemUid};
pub use logger::*;
pub use physics::{PhysicsQueries, ProxyRayCaster};
pub use pointer::{HandPointer, PointerMode, PointerPlugin};
pub use ui::{UiPauseState, UiPlugin};

/// Порядок render-tick систем: pause state → equipment → pointer
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandheldSet {
    Ui,
    Equipment,
    Pointer,
}

/// Главный plugin (объединяет все подсистемы)
pub struct HandheldPlugin;

impl Plugin for HandheldPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz = physics tick (strike cooldown в кадрах)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .init_resource::<DeterministicRng>()
            .init_resource::<HandheldConfig>()
            .init_resource::<ItemCatalog>()
            .init_resource::<AssetManifest>()
            .configure_sets(
                Update,
                (HandheldSet::Ui, HandheldSet::Equipment, HandheldSet::Pointer).chain(),
            )
            .add_plugins((FeedbackPlugin, UiPlugin, EquipmentPlugin, ImpactPlugin, PointerPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Выбор impact clips идёт только через него.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Создаёт Bevy App для headless симуляции
///
/// `init_resource` в plugin'е не перетирает вставленные заранее resources,
/// так что seed/config/catalog можно подменить до `add_plugins`.
pub fn create_headless_app(seed: u64) -> App {
    init_logger();

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(HandheldPlugin);

    app
}
