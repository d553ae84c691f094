//! Animation resource registry.
//!
//! Animation definitions are loaded once from a JSON file and shared by every
//! entity that plays them. Entities refer to them by string key through the
//! [`Animation`](crate::components::animation::Animation) component.
//!
//! ```json
//! {
//!   "textures": { "player": "assets/textures/player.png" },
//!   "animations": {
//!     "player_walk": {
//!       "tex_key": "player", "x": 0, "y": 96,
//!       "frame_width": 64, "frame_height": 96,
//!       "frame_count": 4, "frame_duration": 0.1, "play_mode": "loop"
//!     }
//!   }
//! }
//! ```

use std::path::Path;

use bevy_ecs::prelude::Resource;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayMode {
    #[default]
    Loop,
    /// Stop on the last frame.
    Normal,
}

/// One strip of equally sized frames laid out left to right in a texture.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnimationResource {
    /// Texture key in [`crate::resources::texturestore::TextureStore`].
    pub tex_key: String,
    /// Pixel position of the first frame.
    pub x: f32,
    pub y: f32,
    pub frame_width: f32,
    pub frame_height: f32,
    pub frame_count: usize,
    /// Seconds each frame is shown.
    pub frame_duration: f32,
    #[serde(default)]
    pub play_mode: PlayMode,
}

impl AnimationResource {
    /// Frame shown after `time` seconds of playback.
    pub fn key_frame(&self, time: f32) -> usize {
        let frame = (time.max(0.0) / self.frame_duration) as usize;
        match self.play_mode {
            PlayMode::Loop => frame % self.frame_count,
            PlayMode::Normal => frame.min(self.frame_count - 1),
        }
    }

    /// Top-left pixel of `frame` in the texture.
    pub fn frame_offset(&self, frame: usize) -> Vector2 {
        Vector2::new(self.x + frame as f32 * self.frame_width, self.y)
    }

    pub fn frame_size(&self) -> Vector2 {
        Vector2::new(self.frame_width, self.frame_height)
    }

    fn validate(&self, key: &str) -> Result<(), String> {
        if self.frame_count == 0 {
            return Err(format!("animation '{}' has no frames", key));
        }
        if self.frame_duration <= 0.0 {
            return Err(format!("animation '{}' has a non-positive frame duration", key));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct AnimationFile {
    #[serde(default)]
    textures: FxHashMap<String, String>,
    animations: FxHashMap<String, AnimationResource>,
}

/// Central registry of reusable animation definitions keyed by string IDs.
#[derive(Resource, Debug, Default)]
pub struct AnimationStore {
    pub animations: FxHashMap<String, AnimationResource>,
    /// Texture key to image path, for the binary to load.
    pub textures: FxHashMap<String, String>,
}

impl AnimationStore {
    pub fn get(&self, key: &str) -> Option<&AnimationResource> {
        self.animations.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, animation: AnimationResource) {
        self.animations.insert(key.into(), animation);
    }

    /// Parse the JSON animation file format.
    ///
    /// Every animation must reference a texture listed in the file.
    pub fn from_json(text: &str) -> Result<Self, String> {
        let file: AnimationFile =
            serde_json::from_str(text).map_err(|e| format!("Bad animation file: {}", e))?;
        for (key, anim) in file.animations.iter() {
            anim.validate(key)?;
            if !file.textures.contains_key(&anim.tex_key) {
                return Err(format!(
                    "animation '{}' uses unknown texture '{}'",
                    key, anim.tex_key
                ));
            }
        }
        Ok(Self {
            animations: file.animations,
            textures: file.textures,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read animations {:?}: {}", path, e))?;
        let store = Self::from_json(&text)?;
        log::info!(
            "Loaded {} animations and {} textures from {:?}",
            store.animations.len(),
            store.textures.len(),
            path
        );
        Ok(store)
    }

    /// Fail when any of `keys` is not defined.
    pub fn require(&self, keys: &[&str]) -> Result<(), String> {
        match keys.iter().find(|k| !self.animations.contains_key(**k)) {
            Some(missing) => Err(format!("missing animation '{}'", missing)),
            None => Ok(()),
        }
    }
}
