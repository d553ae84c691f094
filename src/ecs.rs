//! Entity store operations on top of the bevy [`World`].
//!
//! Systems see entities through bevy queries. Code that creates, strips or
//! removes entities goes through the helpers here so that the invariants of
//! family-filtered systems hold:
//!
//! - [`detach`] refuses to remove a component that is not attached
//! - [`remove_entity`] refuses to remove an entity that does not exist, and
//!   runs every [`TeardownHooks`] entry whose [`Family`] the entity matches,
//!   synchronously and while the entity and its components are still readable
//!
//! Both refusals are panics: they mean some upstream code built a malformed
//! entity and the frame cannot continue on corrupt state.
//!
//! Inside a running system use [`queue_remove`], which defers the removal
//! to the point where the system's commands are applied.

use std::any::TypeId;

use bevy_ecs::prelude::*;
use bevy_ecs::world::EntityRef;
use smallvec::SmallVec;

/// Set of required component types.
///
/// An entity belongs to a family when its component set is a superset of the
/// family's.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Family {
    required: SmallVec<[TypeId; 4]>,
}

impl Family {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `T` to the required set.
    pub fn with<T: Component>(mut self) -> Self {
        let id = TypeId::of::<T>();
        if !self.required.contains(&id) {
            self.required.push(id);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.required.len()
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty()
    }

    pub fn matches_ref(&self, entity: &EntityRef) -> bool {
        self.required.iter().all(|id| entity.contains_type_id(*id))
    }

    /// `false` for entities that do not exist.
    pub fn matches(&self, world: &World, entity: Entity) -> bool {
        world
            .get_entity(entity)
            .map(|e| self.matches_ref(&e))
            .unwrap_or(false)
    }
}

/// Teardown callback, run with the entity still alive.
pub type TeardownFn = fn(&mut World, Entity);

/// Ordered table of per-family teardown callbacks.
#[derive(Resource, Default)]
pub struct TeardownHooks {
    hooks: Vec<(Family, TeardownFn)>,
}

impl TeardownHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, family: Family, hook: TeardownFn) {
        self.hooks.push((family, hook));
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    fn matching(&self, world: &World, entity: Entity) -> SmallVec<[TeardownFn; 4]> {
        self.hooks
            .iter()
            .filter(|(family, _)| family.matches(world, entity))
            .map(|(_, hook)| *hook)
            .collect()
    }
}

/// Spawn an entity with no components.
pub fn create_entity(world: &mut World) -> Entity {
    world.spawn_empty().id()
}

/// Attach (or replace) a component.
///
/// Panics if the entity does not exist.
pub fn attach<T: Component>(world: &mut World, entity: Entity, component: T) {
    let Ok(mut e) = world.get_entity_mut(entity) else {
        panic!("attach to missing entity {entity}");
    };
    e.insert(component);
}

/// Detach a component and hand it back.
///
/// Panics if the entity does not exist or `T` is not attached.
pub fn detach<T: Component>(world: &mut World, entity: Entity) -> T {
    let Ok(mut e) = world.get_entity_mut(entity) else {
        panic!("detach from missing entity {entity}");
    };
    match e.take::<T>() {
        Some(component) => component,
        None => panic!(
            "detach of absent component {} from entity {entity}",
            std::any::type_name::<T>()
        ),
    }
}

/// Remove an entity, running its teardown hooks first.
///
/// Panics if the entity does not exist.
pub fn remove_entity(world: &mut World, entity: Entity) {
    if world.get_entity(entity).is_err() {
        panic!("remove of missing entity {entity}");
    }
    let hooks = world
        .get_resource::<TeardownHooks>()
        .map(|table| table.matching(world, entity))
        .unwrap_or_default();
    for hook in hooks {
        hook(world, entity);
    }
    world.despawn(entity);
    log::trace!("removed entity {entity}");
}

/// Queue [`remove_entity`] to run when the calling system's commands apply.
pub fn queue_remove(commands: &mut Commands, entity: Entity) {
    commands.queue(move |world: &mut World| remove_entity(world, entity));
}

/// Every entity matching `family`, in storage order.
pub fn entities_in(world: &mut World, family: &Family) -> Vec<Entity> {
    let mut query = world.query::<EntityRef>();
    query
        .iter(world)
        .filter(|e| family.matches_ref(e))
        .map(|e| e.id())
        .collect()
}
