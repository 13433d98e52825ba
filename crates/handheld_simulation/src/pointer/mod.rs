//! Hand pointer: shared laser/ray per hand
//!
//! # Modes
//! - `Idle` — grip released или в руке предмет: луч скрыт, подсветка снята
//! - `UI` — пауза: луч только по UI layer, pointer-move / click / unclick
//! - `WorldHint` — луч по interactive world, подсветка подходящего mesh
//! - `Grab` — луч упёрся в equipment item, подсвечен только он
//!
//! Ровно один mode на руку; переключение каждый render tick
//! (`update_hand_pointers`, после equipment systems).

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

pub mod systems;

pub use systems::{update_hand_pointers, validate_pointer_setup};

use crate::equipment::ForceAttachRequest;
use crate::feedback::OutlineChanged;
use crate::physics::RayHit;
use crate::HandheldSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum PointerMode {
    #[default]
    Idle,
    UI,
    WorldHint,
    Grab,
}

/// What a pointer currently outlines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightTarget {
    World(Entity),
    Equipment(Entity),
}

impl HighlightTarget {
    pub fn entity(&self) -> Entity {
        match *self {
            HighlightTarget::World(entity) | HighlightTarget::Equipment(entity) => entity,
        }
    }
}

/// Laser visual state (для presentation)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LaserState {
    pub visible: bool,
    pub length: f32,
}

/// Per-hand pointer controller state
#[derive(Component, Debug, Clone, Default)]
pub struct HandPointer {
    pub(crate) mode: PointerMode,
    pub(crate) highlighted: Option<HighlightTarget>,
    pub(crate) last_hit: Option<RayHit>,
    pub(crate) last_ui_point: Option<Vec2>,
    pub(crate) laser: LaserState,
    /// Click отправлен, unclick ещё нет
    pub(crate) ui_pressed: bool,
    pub(crate) interact_was_pressed: bool,
    pub(crate) select_was_pressed: bool,
}

impl HandPointer {
    pub fn mode(&self) -> PointerMode {
        self.mode
    }

    pub fn highlighted(&self) -> Option<HighlightTarget> {
        self.highlighted
    }

    pub fn last_hit(&self) -> Option<&RayHit> {
        self.last_hit.as_ref()
    }

    pub fn last_ui_point(&self) -> Option<Vec2> {
        self.last_ui_point
    }

    pub fn laser(&self) -> LaserState {
        self.laser
    }
}

// ============================================================================
// Events
// ============================================================================

/// Pointer moved over a UI surface (surface-local coordinates)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct UiPointerMove {
    pub hand: Entity,
    pub surface: Entity,
    pub point: Vec2,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct UiClick {
    pub hand: Entity,
    pub point: Vec2,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct UiUnclick {
    pub hand: Entity,
    pub point: Vec2,
}

/// Select pressed: host activates whatever is at the ray's hit point
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct WorldActivate {
    pub hand: Entity,
    pub origin: Vec3,
    pub direction: Dir3,
    pub hit: Option<RayHit>,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerModeChanged {
    pub hand: Entity,
    pub mode: PointerMode,
}

/// Outgoing events of the pointer controller
#[derive(SystemParam)]
pub struct PointerWriters<'w> {
    pub(crate) moves: EventWriter<'w, UiPointerMove>,
    pub(crate) clicks: EventWriter<'w, UiClick>,
    pub(crate) unclicks: EventWriter<'w, UiUnclick>,
    pub(crate) activations: EventWriter<'w, WorldActivate>,
    pub(crate) modes: EventWriter<'w, PointerModeChanged>,
    pub(crate) outlines: EventWriter<'w, OutlineChanged>,
    pub(crate) attach: EventWriter<'w, ForceAttachRequest>,
}

pub struct PointerPlugin;

impl Plugin for PointerPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<UiPointerMove>()
            .add_event::<UiClick>()
            .add_event::<UiUnclick>()
            .add_event::<WorldActivate>()
            .add_event::<PointerModeChanged>()
            .add_systems(Startup, validate_pointer_setup)
            .add_systems(Update, update_hand_pointers.in_set(HandheldSet::Pointer));
    }
}
