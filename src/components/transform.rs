//! World-space pose of an entity.

use bevy_ecs::prelude::Component;
use raylib::prelude::Vector2;

/// Position, non-uniform scale and rotation of an entity in world units.
///
/// For entities with a [`PhysicsBody`](super::physicsbody::PhysicsBody) the
/// physics synchronizer overwrites `position` and `angle` after every sub-step
/// in which the body is awake. While the body sleeps the transform is left
/// alone, so scripted motion may still own it.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vector2,
    pub scale: Vector2,
    /// Rotation in degrees.
    pub angle: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector2::zero(),
            scale: Vector2::new(1.0, 1.0),
            angle: 0.0,
        }
    }
}

impl Transform {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            ..Self::default()
        }
    }

    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = Vector2::new(sx, sy);
        self
    }

    pub fn with_angle(mut self, degrees: f32) -> Self {
        self.angle = degrees;
        self
    }
}
