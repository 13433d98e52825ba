//! Headless прогон handheld simulation
//!
//! Скриптованная сцена без host engine: equip → удар по двери → unequip.
//! Позы рук и контакты подставляются вручную вместо VR runtime и rapier.

use bevy::prelude::*;
use handheld_simulation::equipment::{ItemEquipped, ItemUnequipped};
use handheld_simulation::impact::{ContactPoint, DoorBashed, StrikeContact};
use handheld_simulation::item_catalog::EquipSlot;
use handheld_simulation::physics::LAYER_WORLD;
use handheld_simulation::*;

fn main() {
    let seed = 42;
    println!("Starting handheld headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);

    let world = app.world_mut();
    let player = world.spawn((Player, Transform::default())).id();
    world.spawn((HeadCamera, Transform::from_xyz(0.0, 1.6, 0.0)));
    world.spawn((Hand::new(HandSide::Left), Transform::from_xyz(-0.3, 1.2, -0.4)));
    let right = world
        .spawn((Hand::new(HandSide::Right), Transform::from_xyz(0.3, 1.2, -0.4)))
        .id();
    let door = world.spawn((Door::default(), Transform::from_xyz(0.3, 1.2, -1.0))).id();
    world.insert_resource(PhysicsQueries::new(ProxyRayCaster::default().with_box(
        door,
        Vec3::new(0.3, 1.2, -1.0),
        Vec3::new(0.5, 1.0, 0.05),
        LAYER_WORLD,
    )));

    // Startup: pool + inventory subscription
    app.update();

    let sword = InventoryItem::new(1, "longsword", EquipSlot::RightHand);
    if let Some(mut input) = app.world_mut().get_mut::<HandInput>(right) {
        input.grip = true;
    }
    app.world_mut().send_event(ItemEquipped {
        item: sword.clone(),
        owner: player,
    });
    app.update();

    let Some(weapon) = app.world().resource::<EquipmentRegistry>().bound_instance(sword.uid) else {
        log_error("❌ Longsword was not bound to a pooled instance");
        return;
    };

    // Удар сверху вниз в дверь
    let contact_point = Vec3::new(0.3, 1.2, -0.95);
    if let Some(mut sample) = app.world_mut().get_mut::<PreContactVelocity>(weapon) {
        sample.linear = Vec3::new(0.0, -4.0, -1.0);
        sample.center = contact_point;
    }
    app.world_mut().send_event(StrikeContact {
        striker: weapon,
        struck: door,
        struck_layer: LAYER_WORLD,
        contacts: vec![ContactPoint {
            point: contact_point,
            normal: Vec3::Z,
        }],
    });
    app.world_mut().run_schedule(FixedUpdate);

    let bashed = app.world().resource::<Events<DoorBashed>>().len();
    let open = app.world().get::<Door>(door).is_some_and(|door| door.open);
    println!("Door bashed events: {}, door open: {}", bashed, open);

    app.world_mut().send_event(ItemUnequipped { item: sword, owner: player });
    for tick in 0..10 {
        app.update();

        if tick % 5 == 0 {
            let equipped = app.world().resource::<EquipmentRegistry>().equipped_count();
            println!("Tick {}: {} items equipped", tick, equipped);
        }
    }

    println!("Simulation complete!");
}
