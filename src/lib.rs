//! Ledgehop gameplay core.
//!
//! A 2D platformer built on bevy_ecs and raylib: entities and components live
//! in a bevy [`World`](bevy_ecs::world::World), systems run once per frame in
//! priority order through [`scheduler::SystemScheduler`], rigid bodies are
//! simulated by a [`physics::PhysicsEngine`] stepped at a fixed rate, and the
//! player is driven by a small Idle/Walking/Jumping state machine.
//!
//! - [`components`] – per-entity data
//! - [`ecs`] – entity store helpers: families, teardown hooks, removal
//! - [`events`] – observer events raised by systems
//! - [`game`] – world, level, player and camera assembly
//! - [`physics`] – physics engine contract and its rapier2d backend
//! - [`resources`] – shared world data
//! - [`scheduler`] – priority-ordered system runner
//! - [`systems`] – per-frame behaviour

pub mod components;
pub mod ecs;
pub mod events;
pub mod game;
pub mod physics;
pub mod resources;
pub mod scheduler;
pub mod systems;
