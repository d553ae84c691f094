use bevy_ecs::prelude::Resource;
use raylib::prelude::Texture2D;
use rustc_hash::FxHashMap;

/// Loaded textures keyed by the names used in the animation file.
///
/// Only the binary inserts this; it holds GPU handles.
#[derive(Resource, Default)]
pub struct TextureStore {
    pub map: FxHashMap<String, Texture2D>,
}

impl TextureStore {
    pub fn get(&self, key: &str) -> Option<&Texture2D> {
        self.map.get(key)
    }
}
