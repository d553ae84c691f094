//! Game systems.
//!
//! Every system here is registered with the
//! [`SystemScheduler`](crate::scheduler::SystemScheduler) at one of the
//! priorities in [`crate::scheduler::priority`].
//!
//! Submodules overview
//! - [`animation`] – advance sprite animations
//! - [`camera`] – smooth and clamp the camera rig, drive the render camera
//! - [`character`] – mirror sprites of characters facing left
//! - [`contacts`] – route foot sensor contacts to their characters
//! - [`input`] – read hardware input and toggle debug mode
//! - [`physics`] – fixed-timestep stepping and transform sync
//! - [`player`] – player movement state machine
//! - [`render`] – build the draw queue and draw it with raylib

pub mod animation;
pub mod camera;
pub mod character;
pub mod contacts;
pub mod input;
pub mod physics;
pub mod player;
pub mod render;
