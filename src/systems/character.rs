//! Character facing.

use bevy_ecs::prelude::*;

use crate::components::character::{Character, Direction};
use crate::components::sprite::Sprite;

/// Mirror the sprite of characters looking left.
pub fn character_facing_system(mut query: Query<(&Character, &mut Sprite), Changed<Character>>) {
    for (character, mut sprite) in query.iter_mut() {
        let flip = character.view_direction == Direction::Left;
        if sprite.flip_x != flip {
            sprite.flip_x = flip;
        }
    }
}
