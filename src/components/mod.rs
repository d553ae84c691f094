//! ECS components for entities.
//!
//! Components are plain data. Behaviour lives in [`crate::systems`].
//!
//! Submodules overview:
//! - [`animation`] – playback state for sprite animations
//! - [`camerarig`] – smoothed, bounded camera that follows a target entity
//! - [`character`] – facing direction and ground contact bookkeeping
//! - [`levelmap`] – owner of a level's static collision geometry
//! - [`physicsbody`] – link from an entity to its rigid body
//! - [`player`] – player movement state machine
//! - [`sprite`] – 2D sprite rendering component
//! - [`transform`] – world position, scale and angle

pub mod animation;
pub mod camerarig;
pub mod character;
pub mod levelmap;
pub mod physicsbody;
pub mod player;
pub mod sprite;
pub mod transform;
