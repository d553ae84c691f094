//! Link between an entity and its rigid body.
//!
//! The entity that created a body owns it exclusively. The body is destroyed
//! by the teardown hook registered for the `{PhysicsBody}` family (see
//! [`crate::game::setup_world`]) when the entity is removed through
//! [`crate::ecs::remove_entity`].

use bevy_ecs::prelude::{Component, Entity, World};

use crate::physics::BodyHandle;
use crate::resources::physicsworld::PhysicsWorld;

#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body: BodyHandle,
}

impl PhysicsBody {
    pub fn new(body: BodyHandle) -> Self {
        Self { body }
    }
}

/// Teardown hook: destroy the body owned by `entity`.
pub fn destroy_owned_body(world: &mut World, entity: Entity) {
    let Some(body) = world.get::<PhysicsBody>(entity).map(|p| p.body) else {
        return;
    };
    world.resource_mut::<PhysicsWorld>().destroy_body(body);
    log::debug!("destroyed body {:?} of entity {}", body, entity);
}
