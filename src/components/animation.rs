use bevy_ecs::prelude::Component;

/// Sprite animation playback state.
///
/// `animation_key` names an entry of the
/// [`AnimationStore`](crate::resources::animationstore::AnimationStore).
/// Switching the key through [`Animation::play`] restarts playback from the
/// first frame.
#[derive(Debug, Clone, Component)]
pub struct Animation {
    pub animation_key: String,
    pub frame_index: usize,
    pub elapsed_time: f32,
    /// When set the animation system does not advance this entity.
    pub frozen: bool,
}

impl Animation {
    pub fn new(animation_key: impl Into<String>) -> Self {
        Self {
            animation_key: animation_key.into(),
            frame_index: 0,
            elapsed_time: 0.0,
            frozen: false,
        }
    }

    /// Switch to `key` and reset the playback time.
    pub fn play(&mut self, key: &str) {
        if self.animation_key != key {
            self.animation_key.clear();
            self.animation_key.push_str(key);
        }
        self.frame_index = 0;
        self.elapsed_time = 0.0;
    }
}
