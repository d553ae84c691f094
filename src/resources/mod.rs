//! ECS resources made available to systems.
//!
//! Long-lived data injected into the ECS world: input state, timing, the
//! physics engine, asset stores and the render hand-off.
//!
//! Overview
//! - `animationstore` – definitions for sprite animations reused across entities
//! - `camera2d` – render camera driven by the camera rig
//! - `debugmode` – presence toggles debug overlays
//! - `gameconfig` – INI-backed settings and tuning
//! - `input` – per-frame keyboard state of keys relevant to the game
//! - `levelstore` – collision geometry of loaded levels
//! - `physicsworld` – the shared physics engine
//! - `renderqueue` – layer-ordered draw calls for the renderer
//! - `screensize` – current framebuffer dimensions in pixels
//! - `texturestore` – loaded textures keyed by string IDs
//! - `worldtime` – simulation time and delta
pub mod animationstore;
pub mod camera2d;
pub mod debugmode;
pub mod gameconfig;
pub mod input;
pub mod levelstore;
pub mod physicsworld;
pub mod renderqueue;
pub mod screensize;
pub mod texturestore;
pub mod worldtime;
