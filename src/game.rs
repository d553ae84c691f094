//! World assembly.
//!
//! Builds the ECS world the systems expect: resources, teardown hooks, the
//! level's static geometry, the player and the camera rig, and the system
//! scheduler. The binary adds the window-bound pieces (input polling,
//! drawing, textures) on top.

use std::path::Path;

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::animation::Animation;
use crate::components::camerarig::{CameraRig, WorldBounds};
use crate::components::character::Character;
use crate::components::levelmap::{LevelMap, release_level};
use crate::components::physicsbody::{PhysicsBody, destroy_owned_body};
use crate::components::player::{Player, PlayerState};
use crate::components::sprite::Sprite;
use crate::components::transform::Transform;
use crate::ecs::{Family, TeardownHooks, attach, create_entity};
use crate::events::footcontact::observe_foot_contact;
use crate::physics::rapier::RapierWorld;
use crate::physics::{BodyDef, BodyKind, FixtureDef, FixtureTag, Shape};
use crate::resources::animationstore::AnimationStore;
use crate::resources::camera2d::Camera2DRes;
use crate::resources::gameconfig::GameConfig;
use crate::resources::input::InputState;
use crate::resources::levelstore::{LevelGeometry, LevelStore};
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::renderqueue::RenderQueue;
use crate::resources::screensize::ScreenSize;
use crate::resources::worldtime::WorldTime;
use crate::scheduler::{SystemScheduler, priority};
use crate::systems::animation::animation_system;
use crate::systems::camera::camera_rig_system;
use crate::systems::character::character_facing_system;
use crate::systems::input::debug_toggle_system;
use crate::systems::physics::{FixedStepper, physics_system};
use crate::systems::player::player_system;
use crate::systems::render::render_queue_system;

const LEVEL_FRICTION: f32 = 0.2;

const PLAYER_SCALE: f32 = 0.7;
const PLAYER_HALF_WIDTH: f32 = 0.225;
const PLAYER_HALF_HEIGHT: f32 = 0.335;
/// Distance from the body origin down to the centre of the feet circle.
const PLAYER_FEET_OFFSET: f32 = 0.155;
const PLAYER_LAYER: i32 = 10;
const PLAYER_TEXTURE: &str = "player";
/// Unscaled sprite size in world units (a 64x96 frame at 100 px per unit).
const PLAYER_SPRITE_SIZE: (f32, f32) = (0.64, 0.96);
const PLAYER_FRAME_SIZE: (f32, f32) = (64.0, 96.0);

/// Keys the player's states select.
pub const PLAYER_ANIMATIONS: [&str; 3] = ["player_idle", "player_walk", "player_jump"];

/// Insert every resource the systems read, register the teardown hooks and
/// the foot contact observer.
pub fn setup_world(world: &mut World, config: &GameConfig) {
    let gravity = Vector2::new(0.0, config.physics.gravity_y);
    world.insert_resource(PhysicsWorld::new(RapierWorld::new(gravity)));
    world.insert_resource(FixedStepper::from_config(&config.physics));
    world.insert_resource(WorldTime::default());
    world.insert_resource(InputState::default());
    world.insert_resource(Camera2DRes::default());
    world.insert_resource(ScreenSize {
        w: config.window_width as i32,
        h: config.window_height as i32,
    });
    world.insert_resource(RenderQueue::default());
    world.init_resource::<LevelStore>();
    world.init_resource::<AnimationStore>();
    world.insert_resource(config.clone());

    let mut hooks = TeardownHooks::new();
    hooks.register(Family::new().with::<PhysicsBody>(), destroy_owned_body);
    hooks.register(Family::new().with::<LevelMap>(), release_level);
    world.insert_resource(hooks);

    world.add_observer(observe_foot_contact);
    world.flush();
}

/// Unzoomed view size in world units.
pub fn viewport_of(config: &GameConfig) -> Vector2 {
    Vector2::new(
        config.window_width as f32 / config.pixels_per_unit,
        config.window_height as f32 / config.pixels_per_unit,
    )
}

/// Build the static body of the level stored under `key`.
pub fn spawn_level(world: &mut World, key: &str) -> Result<Entity, String> {
    let shapes = world
        .resource::<LevelStore>()
        .get(key)
        .ok_or_else(|| format!("no level '{}' loaded", key))?
        .shapes()?;

    let entity = create_entity(world);
    let mut physics = world.resource_mut::<PhysicsWorld>();
    let body = physics.create_body(&BodyDef::new(BodyKind::Static, Vector2::zero(), 0.0));
    for shape in shapes {
        let fixture = FixtureDef::new(shape, 0.0, LEVEL_FRICTION, 0.0)
            .with_tag(FixtureTag::LevelGeometry);
        physics.create_fixture(body, &fixture);
    }
    world.entity_mut(entity).insert((
        LevelMap::new(key),
        PhysicsBody::new(body),
        Transform::default(),
    ));
    log::info!("spawned level '{}' as {}", key, entity);
    Ok(entity)
}

/// Spawn the player with its body, foot sensor and sprite at `position`.
///
/// Fails if an animation the player needs is missing from the store.
pub fn spawn_player(world: &mut World, position: Vector2) -> Result<Entity, String> {
    world
        .resource::<AnimationStore>()
        .require(&PLAYER_ANIMATIONS)?;

    let entity = create_entity(world);
    let mut physics = world.resource_mut::<PhysicsWorld>();
    let body = physics.create_body(
        &BodyDef::new(BodyKind::Dynamic, position, 0.0).with_fixed_rotation(true),
    );

    // upper body: box that sits on top of the feet circle
    let box_half_height = (PLAYER_HALF_HEIGHT * 2.0 - PLAYER_HALF_WIDTH) * 0.5;
    let box_center = Vector2::new(0.0, box_half_height - PLAYER_FEET_OFFSET);
    physics.create_fixture(
        body,
        &FixtureDef::new(
            Shape::boxed(PLAYER_HALF_WIDTH, box_half_height, box_center),
            1.0,
            0.2,
            0.0,
        ),
    );
    // feet
    physics.create_fixture(
        body,
        &FixtureDef::new(
            Shape::circle(PLAYER_HALF_WIDTH, Vector2::new(0.0, -PLAYER_FEET_OFFSET)),
            1.0,
            100.0,
            0.0,
        ),
    );
    // ground sensor just below the feet
    let sole = -PLAYER_FEET_OFFSET - PLAYER_HALF_WIDTH;
    physics.create_fixture(
        body,
        &FixtureDef::new(
            Shape::boxed(PLAYER_HALF_WIDTH * 0.4, 0.0225, Vector2::new(0.0, sole)),
            0.0,
            0.0,
            0.0,
        )
        .sensor()
        .with_tag(FixtureTag::FootSensor { owner: entity }),
    );

    let (width, height) = PLAYER_SPRITE_SIZE;
    let sprite = Sprite::new(
        PLAYER_TEXTURE,
        width,
        height,
        Vector2::new(PLAYER_FRAME_SIZE.0, PLAYER_FRAME_SIZE.1),
    )
    .with_origin(Vector2::new(width * 0.5, -sole / PLAYER_SCALE))
    .with_layer(PLAYER_LAYER);

    world.entity_mut(entity).insert((
        Player::new(entity),
        Character::new(),
        PhysicsBody::new(body),
        Transform::new(position.x, position.y).with_scale(PLAYER_SCALE, PLAYER_SCALE),
        Animation::new(PlayerState::Idle.animation_key()),
    ));
    attach(world, entity, sprite);
    log::info!("spawned player {} at ({}, {})", entity, position.x, position.y);
    Ok(entity)
}

/// Spawn a camera rig over `bounds`, starting on the target if there is one.
pub fn spawn_camera_rig(
    world: &mut World,
    target: Option<Entity>,
    bounds: WorldBounds,
    viewport: Vector2,
) -> Entity {
    let follow_speed = world.resource::<GameConfig>().camera.follow_speed;
    let start = target
        .and_then(|t| world.get::<Transform>(t))
        .map(|t| t.position)
        .unwrap_or(Vector2::new(bounds.left, bounds.bottom));
    world
        .spawn((
            CameraRig::new(target, bounds, viewport).with_speed(follow_speed),
            Transform::new(start.x, start.y),
        ))
        .id()
}

/// Load the level and animation files and populate the world.
///
/// Returns the player entity.
pub fn load_game(
    world: &mut World,
    level_path: impl AsRef<Path>,
    animations_path: impl AsRef<Path>,
) -> Result<Entity, String> {
    let animations = AnimationStore::load(animations_path)?;
    world.insert_resource(animations);

    let level_path = level_path.as_ref();
    let level = LevelGeometry::load(level_path)?;
    let key = level_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("level")
        .to_string();
    let bounds = WorldBounds::from_size(level.width, level.height);
    let spawn = level.spawn_point();
    world.resource_mut::<LevelStore>().insert(key.clone(), level);

    spawn_level(world, &key)?;
    let player = spawn_player(world, spawn)?;
    let viewport = viewport_of(world.resource::<GameConfig>());
    spawn_camera_rig(world, Some(player), bounds, viewport);
    Ok(player)
}

/// Scheduler with every gameplay system at its default priority.
pub fn build_scheduler(world: &mut World) -> Result<SystemScheduler, String> {
    let mut scheduler = SystemScheduler::new();
    scheduler.add(world, "debug_toggle", priority::DEBUG_TOGGLE, debug_toggle_system)?;
    scheduler.add(world, "player", priority::PLAYER, player_system)?;
    scheduler.add(world, "physics", priority::PHYSICS, physics_system)?;
    scheduler.add(world, "character_facing", priority::CHARACTER, character_facing_system)?;
    scheduler.add(world, "animation", priority::ANIMATION, animation_system)?;
    scheduler.add(world, "camera", priority::CAMERA, camera_rig_system)?;
    scheduler.add(world, "render_queue", priority::RENDER_QUEUE, render_queue_system)?;
    Ok(scheduler)
}
