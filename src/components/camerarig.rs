//! Camera rig component.
//!
//! The rig is an ordinary entity with a [`Transform`](super::transform::Transform)
//! whose position is smoothed toward a target and clamped to the world
//! bounds. It drives, but is distinct from, the render camera
//! ([`Camera2DRes`](crate::resources::camera2d::Camera2DRes)).

use bevy_ecs::prelude::{Component, Entity};
use raylib::prelude::Vector2;

/// World rectangle the camera view must stay inside. Y grows upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl WorldBounds {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Bounds `[0, width] x [0, height]`.
    pub fn from_size(width: f32, height: f32) -> Self {
        Self::new(0.0, width, height, 0.0)
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct CameraRig {
    /// Followed entity. Never owned; checked for existence every frame.
    pub target: Option<Entity>,
    /// Visible extent is `viewport * zoom`.
    pub zoom: f32,
    pub bounds: WorldBounds,
    /// Fraction of the remaining distance covered per frame.
    pub speed: f32,
    /// Unzoomed viewport size in world units.
    pub viewport: Vector2,
}

impl CameraRig {
    pub fn new(target: Option<Entity>, bounds: WorldBounds, viewport: Vector2) -> Self {
        Self {
            target,
            zoom: 1.0,
            bounds,
            speed: 0.1,
            viewport,
        }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Largest zoom at which the view still fits inside the bounds.
    pub fn max_zoom(&self) -> f32 {
        let horizontal = self.bounds.width() / self.viewport.x;
        let vertical = self.bounds.height() / self.viewport.y;
        horizontal.min(vertical)
    }

    /// Half of the zoomed view, in world units.
    pub fn half_extents(&self) -> Vector2 {
        Vector2::new(
            self.viewport.x * 0.5 * self.zoom,
            self.viewport.y * 0.5 * self.zoom,
        )
    }
}
