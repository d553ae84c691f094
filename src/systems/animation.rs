//! Animation playback.
//!
//! [`animation_system`] advances every unfrozen [`Animation`] by the frame
//! delta and points its [`Sprite`] at the current frame of the strip stored
//! in the [`AnimationStore`]. Entities with an unknown key are left alone.

use bevy_ecs::prelude::*;

use crate::components::animation::Animation;
use crate::components::sprite::Sprite;
use crate::resources::animationstore::AnimationStore;
use crate::resources::worldtime::WorldTime;

/// Advance animation playback and update the sprite frame.
pub fn animation_system(
    mut query: Query<(&mut Animation, &mut Sprite)>,
    animation_store: Res<AnimationStore>,
    time: Res<WorldTime>,
) {
    for (mut anim, mut sprite) in query.iter_mut() {
        let Some(strip) = animation_store.get(&anim.animation_key) else {
            log::trace!("unknown animation '{}'", anim.animation_key);
            continue;
        };
        if !anim.frozen {
            anim.elapsed_time += time.delta;
        }
        let frame = strip.key_frame(anim.elapsed_time);
        anim.frame_index = frame;
        sprite.tex_key.clone_from(&strip.tex_key);
        sprite.offset = strip.frame_offset(frame);
        sprite.region = strip.frame_size();
    }
}
