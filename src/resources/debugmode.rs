//! Debug toggle resource.
//!
//! The mere presence of this resource turns on physics outlines and the
//! diagnostic text overlay. F11 inserts or removes it.

use bevy_ecs::prelude::Resource;

/// Marker resource: when present the binary draws debug overlays.
#[derive(Resource, Clone, Copy, Debug)]
pub struct DebugMode {}
