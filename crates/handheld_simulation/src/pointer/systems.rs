//! Pointer systems
//!
//! Один проход на руку за render tick:
//! 1. input edges (interact / select)
//! 2. mode: Idle / UI / WorldHint / Grab
//! 3. ray + highlight + UI pointer events
//! 4. select → world activation (+ force attach для equipment)

use bevy::prelude::*;

use crate::{
    components::{AttachState, EquipmentItem, Hand, HandInput, HeadCamera, StaticScenery, UiSurface, VisibleMesh},
    config::{HandheldConfig, PointerConfig},
    equipment::ForceAttachRequest,
    feedback::OutlineChanged,
    log_once,
    physics::{PhysicsQueries, RayHit, RayQuery, LAYER_EQUIPMENT, MASK_POINTER_UI, MASK_POINTER_WORLD},
    pointer::{
        HandPointer, HighlightTarget, LaserState, PointerMode, PointerModeChanged, PointerWriters, UiClick,
        UiPointerMove, UiUnclick, WorldActivate,
    },
    ui::UiPauseState,
    LogLevel,
};

/// Текущие highlight'ы всех рук (outline общий на entity)
type HighlightClaims = Vec<(Entity, Option<HighlightTarget>)>;

type PointerHandData = (
    Entity,
    &'static Hand,
    &'static Transform,
    &'static HandInput,
    &'static mut HandPointer,
);

/// Startup: missing references логируются один раз, pointer деградирует
pub fn validate_pointer_setup(
    queries: Option<Res<PhysicsQueries>>,
    hands: Query<&Hand>,
    cameras: Query<(), With<HeadCamera>>,
) {
    if queries.is_none() {
        log_once(
            "pointer/missing-physics-queries",
            LogLevel::Error,
            "❌ PhysicsQueries resource missing: hand pointers inactive",
        );
    }
    if hands.iter().count() != 2 {
        log_once(
            "pointer/hand-count",
            LogLevel::Warning,
            &format!("⚠️ Expected 2 hands, found {}", hands.iter().count()),
        );
    }
    if cameras.is_empty() {
        log_once("pointer/missing-head-camera", LogLevel::Warning, "⚠️ No HeadCamera entity");
    }
}

/// System (Update, after equipment): per-hand pointer controller
pub fn update_hand_pointers(
    mut writers: PointerWriters,
    config: Res<HandheldConfig>,
    pause: Res<UiPauseState>,
    queries: Option<Res<PhysicsQueries>>,
    mut hands: Query<PointerHandData>,
    mut equipment: Query<&mut EquipmentItem>,
    scene: Query<(Has<VisibleMesh>, Has<StaticScenery>)>,
    surfaces: Query<&Transform, (With<UiSurface>, Without<Hand>)>,
) {
    let paused = pause.is_paused();
    let pointer_cfg = &config.pointer;
    let mut claims: HighlightClaims = hands
        .iter()
        .map(|(entity, _, _, _, pointer)| (entity, pointer.highlighted))
        .collect();

    for (hand_entity, hand, hand_transform, input, mut pointer) in hands.iter_mut() {
        let interact_pressed = input.interact && !pointer.interact_was_pressed;
        let interact_released = !input.interact && pointer.interact_was_pressed;
        let select_pressed = input.select && !pointer.select_was_pressed;
        pointer.interact_was_pressed = input.interact;
        pointer.select_was_pressed = input.select;

        let mode = if !input.grip || !hand.is_empty() || queries.is_none() {
            PointerMode::Idle
        } else if paused {
            PointerMode::UI
        } else {
            PointerMode::WorldHint
        };

        // Уход из UI с зажатым interact → unclick в последней точке
        if pointer.mode == PointerMode::UI && mode != PointerMode::UI {
            release_ui_press(hand_entity, &mut pointer, &mut writers.unclicks);
        }

        let origin = hand_transform.translation;
        let direction = hand_transform.forward();

        let next_mode = match (mode, queries.as_deref()) {
            (PointerMode::UI, Some(ray)) => {
                set_highlight(hand_entity, &mut pointer, None, &mut claims, &mut equipment, &mut writers.outlines);
                let hit = ray.cast_ray(&RayQuery {
                    origin,
                    direction,
                    max_distance: pointer_cfg.ui_ray_distance,
                    mask: MASK_POINTER_UI,
                });
                drive_ui(
                    hand_entity,
                    &mut pointer,
                    hit,
                    pointer_cfg,
                    &surfaces,
                    (interact_pressed, interact_released),
                    &mut writers,
                );
                PointerMode::UI
            }
            (PointerMode::WorldHint, Some(ray)) => {
                let hit = ray.cast_ray(&RayQuery {
                    origin,
                    direction,
                    max_distance: pointer_cfg.world_ray_distance,
                    mask: MASK_POINTER_WORLD,
                });

                let target = hit.and_then(|hit| {
                    if let Ok(item) = equipment.get(hit.entity) {
                        // Stowed instance в пуле не цель
                        (item.state != AttachState::Stowed).then_some(HighlightTarget::Equipment(hit.entity))
                    } else {
                        match scene.get(hit.entity) {
                            Ok((true, false)) => Some(HighlightTarget::World(hit.entity)),
                            _ => None,
                        }
                    }
                });
                set_highlight(hand_entity, &mut pointer, target, &mut claims, &mut equipment, &mut writers.outlines);

                pointer.laser = LaserState {
                    visible: true,
                    length: hit.map_or(pointer_cfg.world_ray_distance, |hit| hit.distance),
                };
                pointer.last_hit = hit;

                if select_pressed {
                    writers.activations.write(WorldActivate {
                        hand: hand_entity,
                        origin,
                        direction,
                        hit,
                    });
                    if let Some(hit) = hit.filter(|hit| hit.layer & LAYER_EQUIPMENT != 0) {
                        if equipment.contains(hit.entity) {
                            writers.attach.write(ForceAttachRequest {
                                item: hit.entity,
                                hand: hand_entity,
                            });
                        }
                    }
                }

                match target {
                    Some(HighlightTarget::Equipment(_)) => PointerMode::Grab,
                    _ => PointerMode::WorldHint,
                }
            }
            _ => {
                set_highlight(hand_entity, &mut pointer, None, &mut claims, &mut equipment, &mut writers.outlines);
                pointer.laser = LaserState::default();
                pointer.last_hit = None;
                PointerMode::Idle
            }
        };

        if next_mode != pointer.mode {
            pointer.mode = next_mode;
            writers.modes.write(PointerModeChanged {
                hand: hand_entity,
                mode: next_mode,
            });
        }
    }
}

/// UI mode: hit on a UI surface → surface-local pointer coordinates
fn drive_ui(
    hand_entity: Entity,
    pointer: &mut HandPointer,
    hit: Option<RayHit>,
    config: &PointerConfig,
    surfaces: &Query<&Transform, (With<UiSurface>, Without<Hand>)>,
    (interact_pressed, interact_released): (bool, bool),
    writers: &mut PointerWriters,
) {
    let surface_hit = hit.and_then(|hit| surfaces.get(hit.entity).ok().map(|surface| (hit, surface)));

    pointer.laser = LaserState {
        visible: true,
        length: hit.map_or(config.ui_ray_distance, |hit| hit.distance),
    };
    pointer.last_hit = hit;

    if let Some((hit, surface)) = surface_hit {
        let local = surface.compute_affine().inverse().transform_point3(hit.point);
        let point = Vec2::new(local.x, local.y);
        pointer.last_ui_point = Some(point);
        writers.moves.write(UiPointerMove {
            hand: hand_entity,
            surface: hit.entity,
            point,
        });
    }

    let Some(point) = pointer.last_ui_point else {
        return;
    };

    if interact_pressed {
        pointer.ui_pressed = true;
        writers.clicks.write(UiClick {
            hand: hand_entity,
            point,
        });
    } else if interact_released {
        pointer.ui_pressed = false;
        writers.unclicks.write(UiUnclick {
            hand: hand_entity,
            point,
        });
    }
}

fn release_ui_press(hand_entity: Entity, pointer: &mut HandPointer, unclicks: &mut EventWriter<UiUnclick>) {
    if !pointer.ui_pressed {
        return;
    }
    pointer.ui_pressed = false;

    if let Some(point) = pointer.last_ui_point {
        unclicks.write(UiUnclick {
            hand: hand_entity,
            point,
        });
    }
}

/// Swap the pointer's highlight; outline events только на изменение
///
/// Цель, которую держит другая рука, остаётся подсвеченной.
fn set_highlight(
    hand: Entity,
    pointer: &mut HandPointer,
    target: Option<HighlightTarget>,
    claims: &mut HighlightClaims,
    equipment: &mut Query<&mut EquipmentItem>,
    outlines: &mut EventWriter<OutlineChanged>,
) {
    if pointer.highlighted == target {
        return;
    }

    let claimed_elsewhere = |claims: &HighlightClaims, target: HighlightTarget| {
        claims
            .iter()
            .any(|(other, claim)| *other != hand && *claim == Some(target))
    };

    if let Some(previous) = pointer.highlighted.take() {
        let changed = !claimed_elsewhere(claims, previous)
            && match previous {
                HighlightTarget::World(_) => true,
                HighlightTarget::Equipment(entity) => {
                    equipment.get_mut(entity).is_ok_and(|mut item| item.unhighlight())
                }
            };
        if changed {
            outlines.write(OutlineChanged {
                target: previous.entity(),
                enabled: false,
            });
        }
    }

    if let Some(next) = target {
        let changed = match next {
            HighlightTarget::World(_) => !claimed_elsewhere(claims, next),
            HighlightTarget::Equipment(entity) => equipment.get_mut(entity).is_ok_and(|mut item| item.highlight()),
        };
        if changed {
            outlines.write(OutlineChanged {
                target: next.entity(),
                enabled: true,
            });
        }
    }

    pointer.highlighted = target;
    if let Some(claim) = claims.iter_mut().find(|(other, _)| *other == hand) {
        claim.1 = target;
    }
}
