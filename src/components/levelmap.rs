use bevy_ecs::prelude::{Component, Entity, World};

use crate::resources::levelstore::LevelStore;

/// Marks the entity that owns a loaded level's static geometry.
///
/// `key` names the entry in [`LevelStore`].
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct LevelMap {
    pub key: String,
}

impl LevelMap {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// Teardown hook: release the level data the entity was built from.
pub fn release_level(world: &mut World, entity: Entity) {
    let Some(key) = world.get::<LevelMap>(entity).map(|m| m.key.clone()) else {
        return;
    };
    if let Some(mut store) = world.get_resource_mut::<LevelStore>() {
        if store.remove(&key).is_some() {
            log::info!("released level '{}'", key);
        }
    }
}
