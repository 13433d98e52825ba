//! Equipment system implementations
//!
//! # Systems
//!
//! **Startup:**
//! - `initialize_equipment_pool` — pre-spawn pooled instances from the catalog
//!
//! **Inventory lifecycle (Update):**
//! - `process_item_equipped` — bind instance + attach to hand
//! - `process_item_unequipped` — stow instance back into the pool
//!
//! **Hand interaction (Update):**
//! - `release_on_grip_up` — held item dropped when grip released
//! - `pick_up_floating_items` — grip near a floating item picks it up
//! - `process_force_attach` — pointer select / host grab
//! - `process_highlight_requests` — outline toggle
//! - `follow_attached_items` — kinematic items track their anchor

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalImpulse, RigidBody, Velocity};

use crate::{
    assets::AssetManifest,
    components::{AttachState, EquipmentAsset, EquipmentItem, Hand, HandInput, HeldAnchor, Player},
    config::HandheldConfig,
    equipment::{
        attach::{self, HandRef, ItemBody},
        events::*,
        registry::EquipmentRegistry,
        subscription::InventorySubscription,
    },
    feedback::OutlineChanged,
    item_catalog::{InventoryItem, ItemCatalog},
    log, log_error, log_with_level,
    physics::{RayProxy, LAYER_EQUIPMENT},
    ui::UiPauseState,
};

/// Ray proxy half extents around the grip of a pooled item
const GRAB_PROXY_HALF_EXTENTS: Vec3 = Vec3::splat(0.15);

type ItemBodyData = (
    Entity,
    &'static mut EquipmentItem,
    &'static mut Transform,
    &'static mut RigidBody,
    &'static mut Velocity,
    &'static mut ExternalImpulse,
);

type HandData = (Entity, &'static mut Hand, &'static Transform, &'static HandInput);

// ============================================================================
// Startup
// ============================================================================

/// Pre-spawn one instance per kind (two for one-handed kinds)
pub fn initialize_equipment_pool(
    mut commands: Commands,
    mut registry: ResMut<EquipmentRegistry>,
    catalog: Res<ItemCatalog>,
    assets: Res<AssetManifest>,
) {
    registry.initialize(&catalog, &assets, |definition, path| {
        commands
            .spawn((
                EquipmentItem::from_definition(definition),
                EquipmentAsset { path: path.to_string() },
                RayProxy::new(GRAB_PROXY_HALF_EXTENTS, LAYER_EQUIPMENT),
            ))
            .id()
    });
}

// ============================================================================
// Inventory lifecycle
// ============================================================================

/// Process `ItemEquipped` (player only)
///
/// # Flow
/// 1. Registry: resolve kind → claim idle instance
/// 2. Bind inventory identity + material
/// 3. Attach к руке из equip slot (held или floating)
pub fn process_item_equipped(
    mut events: EventReader<ItemEquipped>,
    mut attached_events: EventWriter<EquipmentAttached>,
    subscription: Res<InventorySubscription>,
    mut registry: ResMut<EquipmentRegistry>,
    catalog: Res<ItemCatalog>,
    config: Res<HandheldConfig>,
    pause: Res<UiPauseState>,
    players: Query<(), With<Player>>,
    mut hands: Query<HandData, Without<EquipmentItem>>,
    mut items: Query<ItemBodyData>,
) {
    if !subscription.is_active() {
        events.clear();
        return;
    }

    for event in events.read() {
        if !players.contains(event.owner) {
            continue;
        }

        let instance = match registry.equip(&catalog, &event.item) {
            Ok(instance) => instance,
            Err(err) => {
                log_with_level(err.severity(), &format!("⚠️ Equip '{}' skipped: {}", event.item.name, err));
                continue;
            }
        };

        let side = event.item.equip_slot.hand_side();
        let Some((hand_entity, mut hand, hand_transform, input)) =
            hands.iter_mut().find(|(_, hand, _, _)| Some(hand.side) == side)
        else {
            log_error(&format!("❌ Equip '{}': no hand for slot {:?}", event.item.name, event.item.equip_slot));
            rollback_equip(&mut registry, &catalog, &event.item);
            continue;
        };

        let Ok((_, mut item, mut transform, mut body, mut velocity, mut impulse)) = items.get_mut(instance) else {
            log_error(&format!("❌ Equip '{}': pooled instance {:?} missing", event.item.name, instance));
            rollback_equip(&mut registry, &catalog, &event.item);
            continue;
        };

        item.bound_item = Some(event.item.uid);
        item.material = event.item.material;

        let mode = attach::attach(
            instance,
            &mut item,
            ItemBody {
                transform: &mut transform,
                body: &mut body,
                velocity: &mut velocity,
                impulse: &mut impulse,
            },
            HandRef {
                entity: hand_entity,
                hand: &mut hand,
                transform: hand_transform,
            },
            input.grip,
            pause.is_paused(),
            &config.pointer.float_anchor(),
        );

        attached_events.write(EquipmentAttached {
            item: instance,
            hand: hand_entity,
            mode,
            tint: item.material.tint(),
        });

        log(&format!(
            "✅ Equipped '{}' ({}) → {} hand, {:?}",
            event.item.name,
            item.kind.0,
            hand.side.as_str(),
            mode
        ));
    }
}

/// Registry claim без attach → вернуть instance в пул
fn rollback_equip(registry: &mut EquipmentRegistry, catalog: &ItemCatalog, item: &InventoryItem) {
    if let Err(err) = registry.unequip(catalog, item) {
        log_error(&format!("❌ Equip rollback '{}' failed: {}", item.name, err));
    }
}

/// Process `ItemUnequipped` (player only)
pub fn process_item_unequipped(
    mut events: EventReader<ItemUnequipped>,
    mut detached_events: EventWriter<EquipmentDetached>,
    mut outline_events: EventWriter<OutlineChanged>,
    subscription: Res<InventorySubscription>,
    mut registry: ResMut<EquipmentRegistry>,
    catalog: Res<ItemCatalog>,
    players: Query<(), With<Player>>,
    mut hands: Query<&mut Hand, Without<EquipmentItem>>,
    mut items: Query<ItemBodyData>,
) {
    if !subscription.is_active() {
        events.clear();
        return;
    }

    for event in events.read() {
        if !players.contains(event.owner) {
            continue;
        }

        let instance = match registry.unequip(&catalog, &event.item) {
            Ok(instance) => instance,
            Err(err) => {
                log_with_level(err.severity(), &format!("⚠️ Unequip '{}' skipped: {}", event.item.name, err));
                continue;
            }
        };

        let Ok((_, mut item, mut transform, mut body, mut velocity, mut impulse)) = items.get_mut(instance) else {
            log_error(&format!("❌ Unequip '{}': pooled instance {:?} missing", event.item.name, instance));
            continue;
        };

        let hand_entity = item.state.hand();
        let hand = hand_entity.and_then(|entity| hands.get_mut(entity).ok());
        let was_highlighted = item.highlighted;

        attach::stow(
            instance,
            &mut item,
            ItemBody {
                transform: &mut transform,
                body: &mut body,
                velocity: &mut velocity,
                impulse: &mut impulse,
            },
            hand.map(|hand| hand.into_inner()),
        );

        // stow снимает highlight молча, host outline гасим здесь
        if was_highlighted {
            outline_events.write(OutlineChanged {
                target: instance,
                enabled: false,
            });
        }

        detached_events.write(EquipmentDetached {
            item: instance,
            hand: hand_entity,
            reason: DetachReason::Unequipped,
        });

        log(&format!("🗑️ Unequipped '{}' → pool", event.item.name));
    }
}

// ============================================================================
// Hand interaction
// ============================================================================

/// Held item + grip released → dynamic, inherits hand velocity
pub fn release_on_grip_up(
    mut detached_events: EventWriter<EquipmentDetached>,
    mut hands: Query<(&mut Hand, &HandInput), Without<EquipmentItem>>,
    mut items: Query<ItemBodyData>,
) {
    for (entity, mut item, mut transform, mut body, mut velocity, mut impulse) in items.iter_mut() {
        let AttachState::Held { hand: hand_entity, .. } = item.state else {
            continue;
        };
        let Ok((mut hand, input)) = hands.get_mut(hand_entity) else {
            continue;
        };
        if input.grip {
            continue;
        }

        attach::detach(
            entity,
            &mut item,
            ItemBody {
                transform: &mut transform,
                body: &mut body,
                velocity: &mut velocity,
                impulse: &mut impulse,
            },
            Some(&mut *hand),
            input.velocity,
        );

        detached_events.write(EquipmentDetached {
            item: entity,
            hand: Some(hand_entity),
            reason: DetachReason::Released,
        });
    }
}

/// Floating item + owning hand grips nearby (empty, not paused) → pickup
pub fn pick_up_floating_items(
    mut attached_events: EventWriter<EquipmentAttached>,
    config: Res<HandheldConfig>,
    pause: Res<UiPauseState>,
    players: Query<&Transform, (With<Player>, Without<EquipmentItem>, Without<Hand>)>,
    mut hands: Query<HandData, Without<EquipmentItem>>,
    mut items: Query<ItemBodyData>,
) {
    if pause.is_paused() {
        return;
    }

    let player_root = players.iter().next();

    for (entity, mut item, mut transform, mut body, mut velocity, mut impulse) in items.iter_mut() {
        let AttachState::Floating { hand: hand_entity } = item.state else {
            continue;
        };
        let Ok((_, mut hand, hand_transform, input)) = hands.get_mut(hand_entity) else {
            continue;
        };
        if !input.grip || !hand.is_empty() {
            continue;
        }
        if hand_transform.translation.distance(transform.translation) > config.pointer.float_grab_radius {
            continue;
        }

        attach::pick_up(
            entity,
            &mut item,
            ItemBody {
                transform: &mut transform,
                body: &mut body,
                velocity: &mut velocity,
                impulse: &mut impulse,
            },
            HandRef {
                entity: hand_entity,
                hand: &mut hand,
                transform: hand_transform,
            },
            player_root,
        );

        attached_events.write(EquipmentAttached {
            item: entity,
            hand: hand_entity,
            mode: AttachMode::Held,
            tint: item.material.tint(),
        });

        log(&format!("✋ Picked up floating '{}' ({} hand)", item.kind.0, hand.side.as_str()));
    }
}

/// Process `ForceAttachRequest`
pub fn process_force_attach(
    mut requests: EventReader<ForceAttachRequest>,
    mut attached_events: EventWriter<EquipmentAttached>,
    players: Query<&Transform, (With<Player>, Without<EquipmentItem>, Without<Hand>)>,
    mut hands: Query<HandData, Without<EquipmentItem>>,
    mut items: Query<ItemBodyData>,
) {
    let player_root = players.iter().next();

    for request in requests.read() {
        let Ok((entity, mut item, mut transform, mut body, mut velocity, mut impulse)) = items.get_mut(request.item)
        else {
            log_error(&format!("❌ ForceAttach: {:?} is not pooled equipment", request.item));
            continue;
        };

        if !item.is_equipped() {
            log(&format!("ForceAttach: '{}' is not equipped, ignored", item.kind.0));
            continue;
        }

        // Уже в другой руке → снимаем оттуда
        if let Some(previous) = item.state.hand().filter(|previous| *previous != request.hand) {
            if let Ok((_, mut previous_hand, _, _)) = hands.get_mut(previous) {
                if previous_hand.attached == Some(entity) {
                    previous_hand.attached = None;
                }
            }
        }

        let Ok((hand_entity, mut hand, hand_transform, _)) = hands.get_mut(request.hand) else {
            log_error(&format!("❌ ForceAttach: hand {:?} not found", request.hand));
            continue;
        };

        if hand.attached == Some(entity) {
            continue;
        }
        if !hand.is_empty() {
            log(&format!("ForceAttach: {} hand is busy", hand.side.as_str()));
            continue;
        }

        attach::pick_up(
            entity,
            &mut item,
            ItemBody {
                transform: &mut transform,
                body: &mut body,
                velocity: &mut velocity,
                impulse: &mut impulse,
            },
            HandRef {
                entity: hand_entity,
                hand: &mut hand,
                transform: hand_transform,
            },
            player_root,
        );

        attached_events.write(EquipmentAttached {
            item: entity,
            hand: hand_entity,
            mode: AttachMode::Held,
            tint: item.material.tint(),
        });
    }
}

/// Process `HighlightRequest` (idempotent; outline event only on change)
pub fn process_highlight_requests(
    mut requests: EventReader<HighlightRequest>,
    mut outline_events: EventWriter<OutlineChanged>,
    mut items: Query<&mut EquipmentItem>,
) {
    for request in requests.read() {
        let Ok(mut item) = items.get_mut(request.item) else {
            continue;
        };

        let changed = if request.enabled {
            item.highlight()
        } else {
            item.unhighlight()
        };

        if changed {
            outline_events.write(OutlineChanged {
                target: request.item,
                enabled: request.enabled,
            });
        }
    }
}

/// Kinematic held/floating items track their anchor pose
pub fn follow_attached_items(
    config: Res<HandheldConfig>,
    hands: Query<&Transform, (With<Hand>, Without<EquipmentItem>)>,
    players: Query<&Transform, (With<Player>, Without<EquipmentItem>, Without<Hand>)>,
    mut items: Query<(&EquipmentItem, &RigidBody, &mut Transform)>,
) {
    let float_anchor = config.pointer.float_anchor();
    let player_root = players.iter().next();

    for (item, body, mut transform) in items.iter_mut() {
        if *body != RigidBody::KinematicPositionBased {
            continue;
        }

        let target = match item.state {
            AttachState::Held {
                hand,
                anchor: HeldAnchor::Hand,
            } => hands.get(hand).ok().map(|hand| hand.mul_transform(item.policy.grip_offset)),
            AttachState::Held {
                anchor: HeldAnchor::PlayerRoot { offset },
                ..
            } => player_root.map(|root| root.mul_transform(offset)),
            AttachState::Floating { hand } => hands.get(hand).ok().map(|hand| hand.mul_transform(float_anchor)),
            AttachState::Stowed | AttachState::Loose => None,
        };

        if let Some(target) = target {
            *transform = target;
        }
    }
}
