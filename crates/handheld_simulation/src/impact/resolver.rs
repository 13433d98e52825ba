//! Impact resolver: collision → qualified gameplay outcome
//!
//! # Pipeline (per `StrikeContact`)
//! 1. Cooldown: < `cooldown_window()` physics frames since last accepted hit → drop
//! 2. Speed gate: pre-contact linear speed < `min_strike_speed` → drop
//! 3. Ray confirmation: из точки контакта (+offset по нормали) против нормали,
//!    только слой ударенного коллайдера; hit должен быть тем же entity
//! 4. Classification (`TargetClass`)
//! 5. State change → haptic + strike direction animation + material audio
//! 6. Invulnerable → "no damage" audio (+ particle), без haptic
//! 7. Ничего не подошло → ничего (не ошибка)

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::{
    components::{
        ActionTrigger, AttachState, Door, EquipmentItem, Hand, HeadCamera, Health, Invulnerable, PreContactVelocity,
        StrikeCooldown, StrikingPiece,
    },
    config::{AudioConfig, HandheldConfig, ImpactConfig},
    feedback::{
        impact_volume, HapticPulse, ImpactAudio, MaterialZone, ParticleEffect, PlayAudioAt, SetWeaponAnimation,
        SpawnParticle,
    },
    impact::{classify::TargetClass, direction::StrikeDirection, events::*},
    log_once,
    physics::{PhysicsFrame, PhysicsQueries, RayQuery},
    DeterministicRng, LogLevel,
};

/// Outgoing events of the resolver
#[derive(SystemParam)]
pub struct ImpactWriters<'w> {
    haptics: EventWriter<'w, HapticPulse>,
    audio: EventWriter<'w, PlayAudioAt>,
    particles: EventWriter<'w, SpawnParticle>,
    animations: EventWriter<'w, SetWeaponAnimation>,
    resolved: EventWriter<'w, ImpactResolved>,
    damage: EventWriter<'w, DamageDealt>,
    doors: EventWriter<'w, DoorBashed>,
    triggers: EventWriter<'w, TriggerActivated>,
}

type TargetData = (
    Option<&'static mut Health>,
    Has<Invulnerable>,
    Option<&'static mut Door>,
    Option<&'static mut ActionTrigger>,
);

/// System (FixedUpdate): resolve strike contacts
pub fn resolve_impacts(
    mut contacts: EventReader<StrikeContact>,
    mut writers: ImpactWriters,
    frame: Res<PhysicsFrame>,
    config: Res<HandheldConfig>,
    audio_pools: Res<ImpactAudio>,
    mut rng: ResMut<DeterministicRng>,
    queries: Option<Res<PhysicsQueries>>,
    mut strikers: Query<(&PreContactVelocity, &mut StrikeCooldown, Option<&StrikingPiece>)>,
    weapons: Query<(&EquipmentItem, &Transform)>,
    mut targets: Query<TargetData>,
    hands: Query<&Hand>,
    cameras: Query<&Transform, With<HeadCamera>>,
) {
    let impact_cfg = &config.impact;

    for contact in contacts.read() {
        let Some(point) = contact.contacts.first() else {
            continue;
        };

        // Не striking body (не экипировка и не sub-piece) → не наше дело
        let Ok((velocity, mut cooldown, piece)) = strikers.get_mut(contact.striker) else {
            continue;
        };
        let weapon_entity = piece.map_or(contact.striker, |piece| piece.weapon);
        let Ok((weapon, weapon_transform)) = weapons.get(weapon_entity) else {
            continue;
        };
        if !weapon.is_equipped() || contact.struck == weapon_entity || contact.struck == contact.striker {
            continue;
        }

        // 1. Cooldown
        if !cooldown.is_ready(frame.0, impact_cfg.cooldown_window()) {
            continue;
        }

        // 2. Speed gate
        let speed = velocity.linear.length();
        if speed < impact_cfg.min_strike_speed {
            continue;
        }

        // 3. Ray confirmation
        let Some(ray) = queries.as_deref() else {
            log_once(
                "impact/missing-physics-queries",
                LogLevel::Error,
                "❌ PhysicsQueries resource missing: strike confirmation disabled",
            );
            continue;
        };
        if !confirm_hit(ray, contact, point, impact_cfg) {
            continue;
        }

        // 4. Classification
        let Ok((health, invulnerable, door, trigger)) = targets.get_mut(contact.struck) else {
            continue;
        };
        let class = TargetClass::classify(health.as_deref(), invulnerable, door.as_deref(), trigger.as_deref());

        let outcome = if class.is_no_damage() {
            Some(ImpactOutcome::NoDamage)
        } else if class.will_change_state() {
            apply_state_change(class, weapon.base_damage, health, door, trigger)
        } else {
            None
        };

        // 7. Nothing qualifies
        let Some(outcome) = outcome else {
            continue;
        };

        cooldown.mark(frame.0);

        if outcome.changed_state() {
            // 5. State change feedback
            let holding_hand = match weapon.state {
                AttachState::Held { hand, .. } => hands.get(hand).ok().map(|h| (hand, h.side)),
                _ => None,
            };

            if let Some((hand, side)) = holding_hand {
                writers.haptics.write(HapticPulse {
                    hand,
                    side,
                    intensity: haptic_intensity(speed, impact_cfg, &config.audio),
                });

                match cameras.iter().next() {
                    Some(camera) => {
                        let contact_velocity = velocity.point_velocity(point.point);
                        if let Some(direction) = StrikeDirection::from_world_velocity(contact_velocity, camera) {
                            writers.animations.write(SetWeaponAnimation { hand, direction });
                        }
                    }
                    None => {
                        log_once(
                            "impact/missing-head-camera",
                            LogLevel::Warning,
                            "⚠️ No HeadCamera: strike direction animation disabled",
                        );
                    }
                }
            }

            let zone = match piece {
                Some(piece) => Some(piece.zone),
                None => {
                    let local = weapon_transform.compute_affine().inverse().transform_point3(point.point);
                    weapon.zones.classify(local)
                }
            };
            if let Some(zone) = zone {
                if let Some(clip) = audio_pools.pick_material(zone, &mut rng.rng) {
                    writers.audio.write(PlayAudioAt {
                        point: point.point,
                        clip: clip.to_string(),
                        volume: impact_volume(speed, zone, &config.audio),
                    });
                }
            }

            match outcome {
                ImpactOutcome::Damaged { amount, killed } => {
                    writers.damage.write(DamageDealt {
                        attacker: weapon_entity,
                        target: contact.struck,
                        damage: amount,
                        target_died: killed,
                    });
                }
                ImpactOutcome::Bashed => {
                    writers.doors.write(DoorBashed {
                        door: contact.struck,
                        striker: contact.striker,
                    });
                }
                ImpactOutcome::Activated => {
                    writers.triggers.write(TriggerActivated {
                        trigger: contact.struck,
                        striker: contact.striker,
                    });
                }
                ImpactOutcome::NoDamage => {}
            }
        } else {
            // 6. No-damage feedback
            if let Some(clip) = audio_pools.pick_no_damage(&mut rng.rng) {
                writers.audio.write(PlayAudioAt {
                    point: point.point,
                    clip: clip.to_string(),
                    volume: impact_volume(speed, MaterialZone::Soft, &config.audio),
                });
            }
            if impact_cfg.no_damage_particle {
                writers.particles.write(SpawnParticle {
                    point: point.point,
                    normal: point.normal,
                    effect: ParticleEffect::NoDamageSpark,
                });
            }
        }

        writers.resolved.write(ImpactResolved {
            striker: contact.striker,
            weapon: weapon_entity,
            target: contact.struck,
            class,
            outcome,
            point: point.point,
            speed,
            frame: frame.0,
        });
    }
}

/// Apply a state-changing strike to the target
fn apply_state_change(
    class: TargetClass,
    damage: u32,
    health: Option<Mut<Health>>,
    door: Option<Mut<Door>>,
    trigger: Option<Mut<ActionTrigger>>,
) -> Option<ImpactOutcome> {
    match class {
        TargetClass::Damageable { .. } => health.map(|mut health| {
            let amount = health.take_damage(damage);
            ImpactOutcome::Damaged {
                amount,
                killed: !health.is_alive(),
            }
        }),
        TargetClass::Openable { .. } => door.map(|mut door| {
            door.open = true;
            ImpactOutcome::Bashed
        }),
        TargetClass::Activatable { .. } => trigger.map(|mut trigger| {
            trigger.activations += 1;
            ImpactOutcome::Activated
        }),
        TargetClass::Inert => None,
    }
}

/// Ray from just outside the contact back into the struck surface must hit
/// exactly the struck entity
pub fn confirm_hit(queries: &PhysicsQueries, contact: &StrikeContact, point: &ContactPoint, config: &ImpactConfig) -> bool {
    let normal = point.normal.normalize_or_zero();
    let Ok(direction) = Dir3::new(-normal) else {
        return false;
    };

    let query = RayQuery {
        origin: point.point + normal * config.revalidation_offset,
        direction,
        max_distance: config.revalidation_distance,
        mask: contact.struck_layer,
    };

    queries
        .cast_ray(&query)
        .is_some_and(|hit| hit.entity == contact.struck)
}

/// Haptic intensity: linear in speed between `min_strike_speed` and `max_speed`
pub fn haptic_intensity(speed: f32, impact: &ImpactConfig, audio: &AudioConfig) -> f32 {
    let range = (audio.max_speed - impact.min_strike_speed).max(f32::EPSILON);
    let t = ((speed - impact.min_strike_speed) / range).clamp(0.0, 1.0);
    impact.haptic_min + (impact.haptic_max - impact.haptic_min) * t
}
