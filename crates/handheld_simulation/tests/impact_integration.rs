//! Impact integration test
//!
//! Удары экипированным longsword'ом (правая рука, grip зажат) по целям:
//! - дверь: bash + haptic + animation + material audio
//! - speed gate, cooldown window, ray confirmation
//! - damageable / invulnerable / dead цели
//!
//! Контакты подаются вручную, FixedUpdate прогоняется напрямую.

use approx::assert_relative_eq;
use bevy::prelude::*;
use handheld_simulation::equipment::ItemEquipped;
use handheld_simulation::feedback::{HapticPulse, PlayAudioAt, SetWeaponAnimation, SpawnParticle};
use handheld_simulation::impact::*;
use handheld_simulation::item_catalog::{EquipSlot, InventoryItem, ItemUid};
use handheld_simulation::physics::{LAYER_ACTORS, LAYER_WORLD};
use handheld_simulation::*;

/// Blade center longsword'а в правой руке (hand at (0.3, 1.2, -0.4))
const BLADE_POINT: Vec3 = Vec3::new(0.3, 1.2, -0.95);
const TARGET_CENTER: Vec3 = Vec3::new(0.3, 1.2, -1.0);
const TARGET_HALF: Vec3 = Vec3::new(0.5, 1.0, 0.05);

struct Arena {
    app: App,
    weapon: Entity,
    right: Entity,
    target: Entity,
    layer: u32,
}

/// Helper: equipped longsword + одна цель с proxy box перед клинком
fn create_arena(target: impl Bundle, layer: u32) -> Arena {
    let mut app = App::new();
    app.add_plugins(HandheldPlugin);

    let world = app.world_mut();
    let player = world.spawn((Player, Transform::default())).id();
    world.spawn((HeadCamera, Transform::from_xyz(0.0, 1.6, 0.0)));
    world.spawn((Hand::new(HandSide::Left), Transform::from_xyz(-0.3, 1.2, -0.4)));
    let right = world
        .spawn((
            Hand::new(HandSide::Right),
            Transform::from_xyz(0.3, 1.2, -0.4),
            HandInput {
                grip: true,
                ..default()
            },
        ))
        .id();
    let target = world.spawn((target, Transform::from_translation(TARGET_CENTER))).id();
    world.insert_resource(PhysicsQueries::new(
        ProxyRayCaster::default().with_box(target, TARGET_CENTER, TARGET_HALF, layer),
    ));

    app.update();

    app.world_mut().send_event(ItemEquipped {
        item: InventoryItem::new(1, "longsword", EquipSlot::RightHand),
        owner: player,
    });
    app.update();

    let weapon = app
        .world()
        .resource::<EquipmentRegistry>()
        .bound_instance(ItemUid(1))
        .expect("longsword bound");

    Arena {
        app,
        weapon,
        right,
        target,
        layer,
    }
}

impl Arena {
    /// Один physics tick с контактом клинка о цель
    fn strike(&mut self, velocity: Vec3) {
        let world = self.app.world_mut();
        let mut sample = world.get_mut::<PreContactVelocity>(self.weapon).expect("weapon sample");
        sample.linear = velocity;
        sample.angular = Vec3::ZERO;
        sample.center = BLADE_POINT;

        self.contact();
    }

    /// Один physics tick с контактом, скорость берётся из последнего sample
    fn contact(&mut self) {
        let world = self.app.world_mut();
        world.send_event(StrikeContact {
            striker: self.weapon,
            struck: self.target,
            struck_layer: self.layer,
            contacts: vec![ContactPoint {
                point: BLADE_POINT,
                normal: Vec3::Z,
            }],
        });
        world.run_schedule(FixedUpdate);
    }

    /// Render frame: хост двигает руку и пишет её tracked velocity
    fn move_hand(&mut self, delta: Vec3, velocity: Vec3) {
        let world = self.app.world_mut();
        world.get_mut::<Transform>(self.right).expect("hand transform").translation += delta;
        world.get_mut::<HandInput>(self.right).expect("hand input").velocity = velocity;
        self.app.update();
    }

    fn sampled_speed(&self) -> f32 {
        self.app
            .world()
            .get::<PreContactVelocity>(self.weapon)
            .expect("weapon sample")
            .linear
            .length()
    }

    /// Physics tick без контактов
    fn idle_tick(&mut self) {
        self.app.world_mut().run_schedule(FixedUpdate);
    }

    fn drain<E: Event>(&mut self) -> Vec<E> {
        self.app.world_mut().resource_mut::<Events<E>>().drain().collect()
    }
}

const DOWNWARD: Vec3 = Vec3::new(0.0, -4.0, 0.0);

#[test]
fn test_door_bash_full_feedback() {
    let mut arena = create_arena(Door::default(), LAYER_WORLD);

    arena.strike(DOWNWARD);

    let bashed = arena.drain::<DoorBashed>();
    assert_eq!(bashed.len(), 1);
    assert_eq!(bashed[0].door, arena.target);
    assert!(arena.app.world().get::<Door>(arena.target).expect("door").open);

    let haptics = arena.drain::<HapticPulse>();
    assert_eq!(haptics.len(), 1);
    assert_eq!(haptics[0].hand, arena.right);
    assert_eq!(haptics[0].side, HandSide::Right);
    assert!(haptics[0].intensity > 0.0 && haptics[0].intensity <= 1.0);

    let animations = arena.drain::<SetWeaponAnimation>();
    assert_eq!(animations.len(), 1);
    assert_eq!(animations[0].direction, StrikeDirection::Down);

    // Контакт клинком → hard pool
    let audio = arena.drain::<PlayAudioAt>();
    assert_eq!(audio.len(), 1);
    assert!(audio[0].clip.starts_with("impact_hard"), "clip {}", audio[0].clip);
    assert!(audio[0].volume > 0.0);

    let resolved = arena.drain::<ImpactResolved>();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].outcome, ImpactOutcome::Bashed);
    assert_eq!(resolved[0].weapon, arena.weapon);
}

#[test]
fn test_slow_contact_rejected() {
    let mut arena = create_arena(Door::default(), LAYER_WORLD);

    arena.strike(Vec3::new(0.0, -0.5, 0.0));

    assert!(arena.drain::<ImpactResolved>().is_empty());
    assert!(arena.drain::<HapticPulse>().is_empty());
    assert!(!arena.app.world().get::<Door>(arena.target).expect("door").open);
}

#[test]
fn test_cooldown_limits_hits_per_window() {
    let mut arena = create_arena(Health::new(100), LAYER_ACTORS);

    // Кадры 1..=4: 1-й принят, 2-й и 3-й внутри окна, 4-й снова принят
    for _ in 0..4 {
        arena.strike(DOWNWARD);
    }

    let damage = arena.drain::<DamageDealt>();
    assert_eq!(damage.len(), 2);
    assert!(damage.iter().all(|event| event.damage == 7));
    assert_eq!(
        arena.app.world().get::<Health>(arena.target).expect("health").current,
        86
    );

    let frames: Vec<u64> = arena.drain::<ImpactResolved>().iter().map(|event| event.frame).collect();
    assert_eq!(frames, vec![1, 4]);
}

#[test]
fn test_rejected_contact_does_not_start_cooldown() {
    let mut arena = create_arena(Health::new(100), LAYER_ACTORS);

    arena.strike(Vec3::new(0.0, -0.2, 0.0));
    arena.strike(DOWNWARD);

    assert_eq!(arena.drain::<DamageDealt>().len(), 1);
}

#[test]
fn test_damage_and_kill() {
    let mut arena = create_arena(Health::new(10), LAYER_ACTORS);

    arena.strike(DOWNWARD);
    for _ in 0..3 {
        arena.idle_tick();
    }
    arena.strike(DOWNWARD);

    let damage = arena.drain::<DamageDealt>();
    assert_eq!(damage.len(), 2);
    assert_eq!(damage[0].damage, 7);
    assert!(!damage[0].target_died);
    assert_eq!(damage[1].damage, 3);
    assert!(damage[1].target_died);

    // Мёртвая цель: ни урона, ни feedback
    for _ in 0..3 {
        arena.idle_tick();
    }
    arena.drain::<HapticPulse>();
    arena.strike(DOWNWARD);
    assert!(arena.drain::<DamageDealt>().is_empty());
    assert!(arena.drain::<HapticPulse>().is_empty());
}

#[test]
fn test_invulnerable_target_no_damage_feedback() {
    let mut arena = create_arena((Health::new(50), Invulnerable), LAYER_ACTORS);

    arena.strike(DOWNWARD);

    assert!(arena.drain::<DamageDealt>().is_empty());
    assert!(arena.drain::<HapticPulse>().is_empty());
    assert_eq!(arena.app.world().get::<Health>(arena.target).expect("health").current, 50);

    let audio = arena.drain::<PlayAudioAt>();
    assert_eq!(audio.len(), 1);
    assert!(audio[0].clip.starts_with("impact_parry"), "clip {}", audio[0].clip);
    assert_eq!(arena.drain::<SpawnParticle>().len(), 1);

    let resolved = arena.drain::<ImpactResolved>();
    assert_eq!(resolved[0].outcome, ImpactOutcome::NoDamage);
}

#[test]
fn test_ray_must_confirm_struck_entity() {
    let mut arena = create_arena(Door::default(), LAYER_WORLD);

    // Коллайдер двери на другом layer'е → ray по layer'у контакта промахивается
    arena.layer = LAYER_ACTORS;
    arena.strike(DOWNWARD);

    assert!(arena.drain::<DoorBashed>().is_empty());
    assert!(!arena.app.world().get::<Door>(arena.target).expect("door").open);
}

#[test]
fn test_ray_blocked_by_other_entity_rejected() {
    let mut arena = create_arena(Door::default(), LAYER_WORLD);

    // Тонкая панель на том же layer'е между точкой контакта и дверью
    let world = arena.app.world_mut();
    let panel_center = Vec3::new(0.3, 1.2, -0.925);
    let panel = world.spawn((VisibleMesh, Transform::from_translation(panel_center))).id();
    world.insert_resource(PhysicsQueries::new(
        ProxyRayCaster::default()
            .with_box(arena.target, TARGET_CENTER, TARGET_HALF, LAYER_WORLD)
            .with_box(panel, panel_center, Vec3::new(0.2, 0.2, 0.01), LAYER_WORLD),
    ));

    arena.strike(DOWNWARD);

    assert!(arena.drain::<ImpactResolved>().is_empty());
    assert!(arena.drain::<DoorBashed>().is_empty());
    assert!(arena.drain::<HapticPulse>().is_empty());
    assert!(!arena.app.world().get::<Door>(arena.target).expect("door").open);
}

#[test]
fn test_held_weapon_speed_stable_with_two_ticks_per_frame() {
    let mut arena = create_arena(Door::default(), LAYER_WORLD);

    // 30 Hz render, 60 Hz physics: рука проходит 0.1m за кадр (3 m/s)
    for _ in 0..3 {
        arena.move_hand(Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.0, -3.0, 0.0));
        for _ in 0..2 {
            arena.idle_tick();
            assert_relative_eq!(arena.sampled_speed(), 3.0, epsilon = 1e-4);
        }
    }
}

#[test]
fn test_slow_tracked_swing_never_qualifies() {
    let mut arena = create_arena(Door::default(), LAYER_WORLD);

    // 0.6 m/s: 0.02m за 30 Hz кадр, два тика на кадр, контакт каждый тик
    arena.move_hand(Vec3::new(0.0, -0.02, 0.0), Vec3::new(0.0, -0.6, 0.0));
    arena.idle_tick();
    for _ in 0..4 {
        arena.contact();
        arena.contact();
        arena.move_hand(Vec3::new(0.0, -0.02, 0.0), Vec3::new(0.0, -0.6, 0.0));
    }
    assert!(arena.drain::<ImpactResolved>().is_empty());
    assert!(!arena.app.world().get::<Door>(arena.target).expect("door").open);

    // Настоящий замах: контакт следующего тика видит 3 m/s
    arena.move_hand(Vec3::new(0.0, -0.1, 0.0), Vec3::new(0.0, -3.0, 0.0));
    arena.idle_tick();
    arena.contact();

    let resolved = arena.drain::<ImpactResolved>();
    assert_eq!(resolved.len(), 1);
    assert_relative_eq!(resolved[0].speed, 3.0, epsilon = 1e-4);
    assert_eq!(resolved[0].outcome, ImpactOutcome::Bashed);
}

#[test]
fn test_trigger_activation() {
    let mut arena = create_arena(ActionTrigger::default(), LAYER_WORLD);

    arena.strike(Vec3::new(3.0, 0.0, 0.0));

    let triggers = arena.drain::<TriggerActivated>();
    assert_eq!(triggers.len(), 1);
    assert_eq!(
        arena
            .app
            .world()
            .get::<ActionTrigger>(arena.target)
            .expect("trigger")
            .activations,
        1
    );
    assert_eq!(arena.drain::<SetWeaponAnimation>()[0].direction, StrikeDirection::Right);
}

#[test]
fn test_inert_target_ignored() {
    let mut arena = create_arena(VisibleMesh, LAYER_WORLD);

    arena.strike(DOWNWARD);

    assert!(arena.drain::<ImpactResolved>().is_empty());
    assert!(arena.drain::<PlayAudioAt>().is_empty());
}

#[test]
fn test_open_door_strike_no_feedback() {
    let mut arena = create_arena(
        Door {
            open: true,
            locked_magically: false,
        },
        LAYER_WORLD,
    );

    arena.strike(Vec3::new(0.0, -5.0, 0.0));

    assert!(arena.drain::<DoorBashed>().is_empty());
    assert!(arena.drain::<HapticPulse>().is_empty());
    assert!(arena.drain::<PlayAudioAt>().is_empty());
    assert!(arena.drain::<SetWeaponAnimation>().is_empty());
    assert!(arena.drain::<ImpactResolved>().is_empty());

    // Ray подтверждает именно дверь, классификация без смены состояния
    let door = *arena.app.world().get::<Door>(arena.target).expect("door");
    assert_eq!(
        TargetClass::classify(None, false, Some(&door), None),
        TargetClass::Openable { will_be_bashed: false }
    );
}
