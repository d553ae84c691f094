//! Fixed-step physics integration tests: transform sync, accumulator
//! behaviour, contact routing and body teardown.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use ledgehop::components::character::Character;
use ledgehop::components::physicsbody::{PhysicsBody, destroy_owned_body};
use ledgehop::components::transform::Transform;
use ledgehop::ecs::{Family, TeardownHooks, remove_entity};
use ledgehop::events::footcontact::observe_foot_contact;
use ledgehop::physics::rapier::RapierWorld;
use ledgehop::physics::{BodyDef, BodyHandle, BodyKind, FixtureDef, FixtureTag, Shape};
use ledgehop::resources::physicsworld::PhysicsWorld;
use ledgehop::resources::worldtime::WorldTime;
use ledgehop::scheduler::SystemScheduler;
use ledgehop::systems::physics::{AccumulatorMode, FixedStepper, physics_system};

const EPSILON: f32 = 1e-5;
const STEP: f32 = 1.0 / 60.0;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(gravity_y: f32, mode: AccumulatorMode) -> World {
    let mut world = World::new();
    world.insert_resource(PhysicsWorld::new(RapierWorld::new(Vector2::new(0.0, gravity_y))));
    world.insert_resource(FixedStepper::new(STEP, 0.25, mode));
    world.insert_resource(WorldTime::default());
    let mut hooks = TeardownHooks::new();
    hooks.register(Family::new().with::<PhysicsBody>(), destroy_owned_body);
    world.insert_resource(hooks);
    world.add_observer(observe_foot_contact);
    world.flush();
    world
}

fn physics_scheduler(world: &mut World) -> SystemScheduler {
    let mut scheduler = SystemScheduler::new();
    scheduler
        .add(world, "physics", 20, physics_system)
        .expect("schedule physics");
    scheduler
}

fn dynamic_body(world: &mut World, def: BodyDef, shape: Shape, tag: FixtureTag) -> BodyHandle {
    let mut physics = world.resource_mut::<PhysicsWorld>();
    let body = physics.create_body(&def);
    physics.create_fixture(body, &FixtureDef::new(shape, 1.0, 0.2, 0.0).with_tag(tag));
    body
}

fn ground(world: &mut World) -> BodyHandle {
    let mut physics = world.resource_mut::<PhysicsWorld>();
    let body = physics.create_body(&BodyDef::new(BodyKind::Static, Vector2::zero(), 0.0));
    physics.create_fixture(
        body,
        &FixtureDef::new(
            Shape::boxed(10.0, 0.5, Vector2::new(0.0, -0.5)),
            0.0,
            0.2,
            0.0,
        )
        .with_tag(FixtureTag::LevelGeometry),
    );
    body
}

#[test]
fn awake_bodies_sync_into_transforms_and_sleeping_ones_do_not() {
    let mut world = make_world(-9.8, AccumulatorMode::Fixed);
    let falling_body = dynamic_body(
        &mut world,
        BodyDef::new(BodyKind::Dynamic, Vector2::new(0.0, 5.0), 0.0),
        Shape::boxed(0.5, 0.5, Vector2::zero()),
        FixtureTag::None,
    );
    let sleeping_body = dynamic_body(
        &mut world,
        BodyDef::new(BodyKind::Dynamic, Vector2::new(3.0, 5.0), 0.0),
        Shape::boxed(0.5, 0.5, Vector2::zero()),
        FixtureTag::None,
    );
    world
        .resource_mut::<PhysicsWorld>()
        .set_awake(sleeping_body, false);

    let falling = world
        .spawn((PhysicsBody::new(falling_body), Transform::new(0.0, 5.0)))
        .id();
    // scripted position, owned by someone else while the body sleeps
    let sleeping = world
        .spawn((PhysicsBody::new(sleeping_body), Transform::new(7.0, 7.0)))
        .id();

    let scheduler = physics_scheduler(&mut world);
    for _ in 0..5 {
        scheduler.run_frame(&mut world, STEP * 1.5).unwrap();
    }

    let physics = world.resource::<PhysicsWorld>();
    let body_pos = physics.position(falling_body);
    let transform = world.get::<Transform>(falling).unwrap();
    assert!(body_pos.y < 5.0);
    assert!(approx_eq(transform.position.x, body_pos.x));
    assert!(approx_eq(transform.position.y, body_pos.y));

    let untouched = world.get::<Transform>(sleeping).unwrap();
    assert_eq!(untouched.position, Vector2::new(7.0, 7.0));
}

#[test]
fn spinning_body_syncs_its_angle_in_degrees() {
    let mut world = make_world(0.0, AccumulatorMode::Fixed);
    let body = dynamic_body(
        &mut world,
        BodyDef::from_pose(BodyKind::Dynamic, Vector2::zero(), 10.0),
        Shape::boxed(0.5, 0.25, Vector2::zero()),
        FixtureTag::None,
    );
    world
        .resource_mut::<PhysicsWorld>()
        .set_angular_velocity(body, 1.0);
    let spinner = world
        .spawn((PhysicsBody::new(body), Transform::new(0.0, 0.0).with_angle(10.0)))
        .id();

    let scheduler = physics_scheduler(&mut world);
    for _ in 0..30 {
        scheduler.run_frame(&mut world, STEP).unwrap();
    }

    let physics = world.resource::<PhysicsWorld>();
    let radians = physics.angle(body);
    let transform = world.get::<Transform>(spinner).unwrap();
    // half a second at 1 rad/s on top of the starting 10 degrees
    assert!((radians - (10.0f32.to_radians() + 0.5)).abs() < 0.02);
    assert!((transform.angle - radians.to_degrees()).abs() < 1e-3);
    assert!(transform.angle > 35.0, "angle stayed at {}", transform.angle);
}

#[test]
fn fixed_accumulator_steps_match_accumulated_time() {
    let mut world = make_world(0.0, AccumulatorMode::Fixed);
    let scheduler = physics_scheduler(&mut world);
    for _ in 0..10 {
        scheduler.run_frame(&mut world, 0.021).unwrap();
    }
    // floor(0.21 / (1/60)) = 12
    assert_eq!(world.resource::<FixedStepper>().total_steps(), 12);
}

#[test]
fn legacy_accumulator_settles_to_one_step_per_frame() {
    let mut world = make_world(0.0, AccumulatorMode::Legacy);
    let scheduler = physics_scheduler(&mut world);
    for _ in 0..10 {
        scheduler.run_frame(&mut world, 0.01).unwrap();
    }
    // first frame stays below the step, every later frame steps exactly once
    assert_eq!(world.resource::<FixedStepper>().total_steps(), 9);

    let mut world = make_world(0.0, AccumulatorMode::Legacy);
    let scheduler = physics_scheduler(&mut world);
    for _ in 0..10 {
        scheduler.run_frame(&mut world, 0.05).unwrap();
    }
    // 0.5 s of frames, 10 steps instead of 30
    assert_eq!(world.resource::<FixedStepper>().total_steps(), 10);
}

#[test]
fn landing_foot_sensor_counts_one_contact_and_teardown_ends_it() {
    let mut world = make_world(-9.8, AccumulatorMode::Fixed);
    ground(&mut world);

    let hero = world.spawn(Character::new()).id();
    let body = {
        let mut physics = world.resource_mut::<PhysicsWorld>();
        let body = physics.create_body(
            &BodyDef::new(BodyKind::Dynamic, Vector2::new(0.0, 1.0), 0.0).with_fixed_rotation(true),
        );
        physics.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(0.2, 0.3, Vector2::zero()), 1.0, 0.2, 0.0),
        );
        physics.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(0.1, 0.02, Vector2::new(0.0, -0.3)), 0.0, 0.0, 0.0)
                .sensor()
                .with_tag(FixtureTag::FootSensor { owner: hero }),
        );
        body
    };
    world
        .entity_mut(hero)
        .insert((PhysicsBody::new(body), Transform::new(0.0, 1.0)));

    let scheduler = physics_scheduler(&mut world);
    for _ in 0..90 {
        scheduler.run_frame(&mut world, STEP).unwrap();
        let character = world.get::<Character>(hero).unwrap();
        assert_eq!(character.foot_contacts_count(), character.foot_contacts().len());
    }
    let character = world.get::<Character>(hero).unwrap();
    assert_eq!(character.foot_contacts_count(), 1);
    let transform = world.get::<Transform>(hero).unwrap();
    assert!((transform.position.y - 0.3).abs() < 0.05);

    remove_entity(&mut world, hero);
    assert!(!world.resource::<PhysicsWorld>().contains_body(body));
    // the end event of the destroyed body's contact reaches nobody
    scheduler.run_frame(&mut world, STEP).unwrap();
}

#[test]
#[should_panic(expected = "already destroyed")]
fn destroying_a_body_twice_is_fatal() {
    let mut world = make_world(0.0, AccumulatorMode::Fixed);
    let body = dynamic_body(
        &mut world,
        BodyDef::new(BodyKind::Dynamic, Vector2::zero(), 0.0),
        Shape::circle(0.5, Vector2::zero()),
        FixtureTag::None,
    );
    let e = world.spawn(PhysicsBody::new(body)).id();
    remove_entity(&mut world, e);
    world.resource_mut::<PhysicsWorld>().destroy_body(body);
}
