//! Priority-ordered frame scheduler.
//!
//! Systems are registered into the [`World`] as one-shot systems and kept in
//! a list sorted by ascending priority; systems with equal priority keep their
//! registration order. [`SystemScheduler::run_frame`] updates
//! [`WorldTime`] with the frame delta and then runs every system once.
//!
//! A system's [`Commands`](bevy_ecs::prelude::Commands) are applied as soon as
//! that system returns, so entities queued for removal or spawned during a
//! system's iteration only become visible to the systems after it.

use bevy_ecs::prelude::*;
use bevy_ecs::system::SystemId;

use crate::resources::worldtime::WorldTime;

/// Default priorities of the game systems.
pub mod priority {
    pub const INPUT: i32 = 0;
    pub const DEBUG_TOGGLE: i32 = 5;
    pub const PLAYER: i32 = 10;
    pub const PHYSICS: i32 = 20;
    pub const CHARACTER: i32 = 30;
    pub const ANIMATION: i32 = 40;
    pub const CAMERA: i32 = 50;
    pub const RENDER_QUEUE: i32 = 60;
    pub const RENDER: i32 = 70;
}

struct ScheduledSystem {
    name: String,
    priority: i32,
    id: SystemId,
}

/// Ordered list of named systems.
#[derive(Default)]
pub struct SystemScheduler {
    systems: Vec<ScheduledSystem>,
}

impl SystemScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `system` under `name` with `priority`.
    ///
    /// Names must be unique; reusing one is an error.
    pub fn add<M>(
        &mut self,
        world: &mut World,
        name: impl Into<String>,
        priority: i32,
        system: impl IntoSystem<(), (), M> + 'static,
    ) -> Result<(), String> {
        let name = name.into();
        if self.systems.iter().any(|s| s.name == name) {
            return Err(format!("system '{}' is already scheduled", name));
        }
        let id = world.register_system(system);
        // after every entry with priority <= ours
        let index = self.systems.partition_point(|s| s.priority <= priority);
        log::debug!("scheduled system '{}' at priority {}", name, priority);
        self.systems.insert(
            index,
            ScheduledSystem {
                name,
                priority,
                id,
            },
        );
        Ok(())
    }

    /// Unschedule `name` and unregister it from the world.
    pub fn remove(&mut self, world: &mut World, name: &str) -> Result<(), String> {
        let Some(index) = self.systems.iter().position(|s| s.name == name) else {
            return Err(format!("no system named '{}'", name));
        };
        let entry = self.systems.remove(index);
        world
            .unregister_system(entry.id)
            .map_err(|e| format!("failed to unregister '{}': {}", name, e))?;
        Ok(())
    }

    /// Scheduled system names in execution order.
    pub fn names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Advance [`WorldTime`] by `dt` and run every system once, in order.
    pub fn run_frame(&self, world: &mut World, dt: f32) -> Result<(), String> {
        world.get_resource_or_init::<WorldTime>().advance(dt);
        for entry in self.systems.iter() {
            world
                .run_system(entry.id)
                .map_err(|e| format!("system '{}' failed: {}", entry.name, e))?;
        }
        Ok(())
    }
}
