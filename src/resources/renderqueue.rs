//! Draw calls handed to the renderer.
//!
//! Built every frame by
//! [`render_queue_system`](crate::systems::render::render_queue_system) and
//! consumed by the binary. Positions and sizes are in world units; the
//! renderer converts to pixels and flips the Y axis.

use bevy_ecs::prelude::{Entity, Resource};
use raylib::prelude::Vector2;

#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub entity: Entity,
    pub tex_key: String,
    /// Top-left of the source region in texture pixels.
    pub region_offset: Vector2,
    pub region_size: Vector2,
    pub position: Vector2,
    /// Destination size after scaling.
    pub size: Vector2,
    /// Pivot from the bottom-left of the destination, scaled.
    pub origin: Vector2,
    /// Degrees, counter-clockwise.
    pub rotation: f32,
    pub flip_x: bool,
    pub flip_y: bool,
    pub layer: i32,
}

/// Draw calls of the current frame in drawing order.
#[derive(Resource, Debug, Default)]
pub struct RenderQueue {
    pub calls: Vec<DrawCall>,
}
