//! Physics frame counter и velocity sampling

use bevy::prelude::*;
use bevy_rapier3d::prelude::{RigidBody, Velocity};

use crate::components::{AttachState, EquipmentItem, Hand, HandInput, HeldAnchor, PreContactVelocity};

/// Physics tick counter (FixedUpdate). Cooldowns считаются в этих кадрах.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PhysicsFrame(pub u64);

/// System: первая в FixedUpdate
pub fn advance_physics_frame(mut frame: ResMut<PhysicsFrame>) {
    frame.0 += 1;
}

/// System: sample velocity of every striking body at the end of the tick
///
/// - Dynamic body → rapier `Velocity`
/// - Held / floating at a hand → tracked hand velocity (v + ω × r)
/// - Other kinematic body → finite difference against the previous sample
///
/// Поза руки пишется раз в render frame, а тиков в нём может быть 0..N,
/// поэтому предметы в руке не дифференцируются по `Transform`.
///
/// Контакты следующего тика оцениваются по этому sample.
pub fn sample_strike_velocities(
    frame: Res<PhysicsFrame>,
    time: Res<Time<Fixed>>,
    hands: Query<(&Transform, &HandInput), With<Hand>>,
    mut bodies: Query<
        (
            &Transform,
            Option<&RigidBody>,
            Option<&Velocity>,
            Option<&EquipmentItem>,
            &mut PreContactVelocity,
        ),
        Without<Hand>,
    >,
) {
    let dt = time.timestep().as_secs_f32();

    for (transform, body, velocity, item, mut sample) in bodies.iter_mut() {
        let dynamic = matches!(body, Some(RigidBody::Dynamic));
        let tracking_hand = item.and_then(|item| hand_driven_by(&item.state)).and_then(|hand| hands.get(hand).ok());

        let (linear, angular) = match (dynamic, velocity, tracking_hand) {
            (true, Some(velocity), _) => (velocity.linvel, velocity.angvel),
            (_, _, Some((hand_transform, input))) => hand_velocity_at(hand_transform, input, transform.translation),
            _ if sample.frame == 0 || dt <= f32::EPSILON => (Vec3::ZERO, Vec3::ZERO),
            _ => finite_difference(&sample, transform, dt),
        };

        *sample = PreContactVelocity {
            linear,
            angular,
            center: transform.translation,
            rotation: transform.rotation,
            frame: frame.0,
        };
    }
}

/// Hand whose tracked pose the item rigidly follows
fn hand_driven_by(state: &AttachState) -> Option<Entity> {
    match *state {
        AttachState::Held {
            hand,
            anchor: HeldAnchor::Hand,
        }
        | AttachState::Floating { hand } => Some(hand),
        _ => None,
    }
}

/// Velocity of a point rigidly attached to a tracked hand
fn hand_velocity_at(hand: &Transform, input: &HandInput, point: Vec3) -> (Vec3, Vec3) {
    let linear = input.velocity + input.angular_velocity.cross(point - hand.translation);
    (linear, input.angular_velocity)
}

fn finite_difference(previous: &PreContactVelocity, transform: &Transform, dt: f32) -> (Vec3, Vec3) {
    let linear = (transform.translation - previous.center) / dt;

    let delta = transform.rotation * previous.rotation.inverse();
    let (axis, mut angle) = delta.to_axis_angle();
    // Кратчайший поворот
    if angle > std::f32::consts::PI {
        angle -= std::f32::consts::TAU;
    }
    let angular = if angle.abs() > f32::EPSILON { axis * (angle / dt) } else { Vec3::ZERO };

    (linear, angular)
}
