//! Shared physics engine resource.
//!
//! There is exactly one engine per world. It is mutated from the frame thread
//! only: by builders while spawning, by the player system through forces and
//! impulses, and by the physics system when stepping.

use std::ops::{Deref, DerefMut};

use bevy_ecs::prelude::Resource;

use crate::physics::PhysicsEngine;

#[derive(Resource)]
pub struct PhysicsWorld {
    engine: Box<dyn PhysicsEngine>,
}

impl PhysicsWorld {
    pub fn new(engine: impl PhysicsEngine + 'static) -> Self {
        Self {
            engine: Box::new(engine),
        }
    }

    pub fn from_boxed(engine: Box<dyn PhysicsEngine>) -> Self {
        Self { engine }
    }
}

impl Deref for PhysicsWorld {
    type Target = dyn PhysicsEngine;

    fn deref(&self) -> &Self::Target {
        self.engine.as_ref()
    }
}

impl DerefMut for PhysicsWorld {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.engine.as_mut()
    }
}
