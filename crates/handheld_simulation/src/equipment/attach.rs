//! Attachment state machine operations
//!
//! Чистые функции над компонентами одного item + одной руки.
//! Системы только достают компоненты из ECS и шлют события.

use bevy::prelude::*;
use bevy_rapier3d::prelude::{ExternalImpulse, RigidBody, Velocity};

use crate::components::{AttachState, EquipmentItem, Hand, HeldAnchor};
use crate::equipment::events::AttachMode;

/// Hand side of an attach operation
pub struct HandRef<'a> {
    pub entity: Entity,
    pub hand: &'a mut Hand,
    pub transform: &'a Transform,
}

/// Physical body of a pooled item
pub struct ItemBody<'a> {
    pub transform: &'a mut Transform,
    pub body: &'a mut RigidBody,
    pub velocity: &'a mut Velocity,
    pub impulse: &'a mut ExternalImpulse,
}

/// Attach a freshly equipped item to a hand.
///
/// - grip pressed, not paused, hand empty → rigid kinematic attach
/// - otherwise → floating at the hand's float anchor until picked up
pub fn attach(
    item_entity: Entity,
    item: &mut EquipmentItem,
    body: ItemBody,
    hand: HandRef,
    grip: bool,
    paused: bool,
    float_anchor: &Transform,
) -> AttachMode {
    item.hand_side = Some(hand.hand.side);
    *body.body = RigidBody::KinematicPositionBased;
    *body.velocity = Velocity::zero();

    if grip && !paused && hand.hand.is_empty() {
        item.state = AttachState::Held {
            hand: hand.entity,
            anchor: HeldAnchor::Hand,
        };
        hand.hand.attached = Some(item_entity);
        *body.transform = hand.transform.mul_transform(item.policy.grip_offset);
        AttachMode::Held
    } else {
        item.state = AttachState::Floating { hand: hand.entity };
        *body.transform = hand.transform.mul_transform(*float_anchor);
        AttachMode::Floating
    }
}

/// Pick up an item (floating grab, force-attach, host grab).
///
/// Policy:
/// - `parent_to_hand == false` → pose tracks the player root
/// - `kinematic_on_attach == false` → kinematic flag explicitly cleared
pub fn pick_up(
    item_entity: Entity,
    item: &mut EquipmentItem,
    body: ItemBody,
    hand: HandRef,
    player_root: Option<&Transform>,
) {
    let anchor = match (item.policy.parent_to_hand, player_root) {
        (false, Some(root)) => HeldAnchor::PlayerRoot {
            offset: relative_to(root, body.transform),
        },
        _ => HeldAnchor::Hand,
    };

    item.state = AttachState::Held {
        hand: hand.entity,
        anchor,
    };
    item.hand_side = Some(hand.hand.side);
    hand.hand.attached = Some(item_entity);

    *body.velocity = Velocity::zero();
    *body.body = if item.policy.kinematic_on_attach {
        RigidBody::KinematicPositionBased
    } else {
        RigidBody::Dynamic
    };

    if anchor == HeldAnchor::Hand {
        *body.transform = hand.transform.mul_transform(item.policy.grip_offset);
    }
}

/// Release an item from its hand into dynamic simulation.
///
/// Non-zero hand velocity is inherited as an impulse (velocity × mass).
pub fn detach(item_entity: Entity, item: &mut EquipmentItem, body: ItemBody, hand: Option<&mut Hand>, hand_velocity: Vec3) {
    if let Some(hand) = hand {
        release_hand(hand, item_entity);
    }

    item.state = AttachState::Loose;
    *body.body = RigidBody::Dynamic;

    if hand_velocity != Vec3::ZERO {
        body.impulse.impulse += hand_velocity * item.mass;
    }
}

/// Return an item to the pool (hidden, unbound)
pub fn stow(item_entity: Entity, item: &mut EquipmentItem, body: ItemBody, hand: Option<&mut Hand>) {
    if let Some(hand) = hand {
        release_hand(hand, item_entity);
    }

    item.state = AttachState::Stowed;
    item.bound_item = None;
    item.hand_side = None;
    item.highlighted = false;

    *body.body = RigidBody::KinematicPositionBased;
    *body.velocity = Velocity::zero();
    *body.impulse = ExternalImpulse::default();
}

fn release_hand(hand: &mut Hand, item_entity: Entity) {
    if hand.attached == Some(item_entity) {
        hand.attached = None;
    }
}

/// `child` expressed in `parent`'s local frame
pub fn relative_to(parent: &Transform, child: &Transform) -> Transform {
    let inverse = parent.compute_affine().inverse();
    Transform::from_matrix(Mat4::from(inverse * child.compute_affine()))
}
