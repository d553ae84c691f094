//! Render camera resource.
//!
//! Wraps raylib's [`raylib::prelude::Camera2D`]. The camera rig system owns
//! its contents and the binary hands it to `begin_mode2D` every frame.

use bevy_ecs::prelude::Resource;
use raylib::prelude::{Camera2D, Vector2};

/// ECS resource that holds the active 2D camera parameters.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Camera2DRes(pub Camera2D);

impl Default for Camera2DRes {
    fn default() -> Self {
        Camera2DRes(Camera2D {
            offset: Vector2::zero(),
            target: Vector2::zero(),
            rotation: 0.0,
            zoom: 1.0,
        })
    }
}
