//! Screen size resource.
//!
//! Stores the current framebuffer dimensions in pixels. The camera system
//! reads it to centre the view and derive the render zoom.

use bevy_ecs::prelude::Resource;

/// Current screen size in pixels.
#[derive(Resource, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenSize {
    /// Width in pixels.
    pub w: i32,
    /// Height in pixels.
    pub h: i32,
}
