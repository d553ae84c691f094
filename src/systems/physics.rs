//! Fixed-timestep physics stepping.
//!
//! The render loop runs at whatever rate the display gives us; the physics
//! engine is only ever stepped by a fixed `step`. [`FixedStepper`] carries the
//! unsimulated remainder between frames and [`physics_system`] drains it:
//!
//! 1. `frame_time = min(dt, max_frame_time)`
//! 2. add the frame time to the accumulator
//! 3. while the accumulator holds at least one step: step the engine, trigger
//!    a [`FootContactEvent`](crate::events::footcontact::FootContactEvent)
//!    for every foot sensor contact, copy the pose of every awake body into
//!    its [`Transform`] and take one step off the accumulator
//!
//! The foot contact observers run when the system's commands are applied, in
//! the order the contacts were reported.
//!
//! [`AccumulatorMode::Legacy`] keeps the older bookkeeping, which adds the
//! unclamped `dt` and takes `frame_time` off per step instead. With a
//! constant `dt` at or below the clamp, it settles to exactly one step per
//! frame once the accumulator first reaches `step`, whatever the frame rate.
//!
//! Sleeping bodies are not synced, so a transform moved by other code stays
//! where it was put until the body wakes up.

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::*;

use crate::components::physicsbody::PhysicsBody;
use crate::components::transform::Transform;
use crate::resources::gameconfig::PhysicsConfig;
use crate::resources::physicsworld::PhysicsWorld;
use crate::resources::worldtime::WorldTime;
use crate::systems::contacts::trigger_foot_contacts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccumulatorMode {
    /// Clamp, accumulate, decrement by the step.
    #[default]
    Fixed,
    /// Accumulate the raw delta, decrement by the clamped frame time.
    Legacy,
}

impl FromStr for AccumulatorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(AccumulatorMode::Fixed),
            "legacy" => Ok(AccumulatorMode::Legacy),
            other => Err(format!(
                "unknown accumulator mode '{}', expected fixed or legacy",
                other
            )),
        }
    }
}

impl fmt::Display for AccumulatorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccumulatorMode::Fixed => write!(f, "fixed"),
            AccumulatorMode::Legacy => write!(f, "legacy"),
        }
    }
}

/// Accumulator state and stepping parameters.
#[derive(Resource, Debug, Clone)]
pub struct FixedStepper {
    pub step: f32,
    pub max_frame_time: f32,
    pub velocity_iterations: u32,
    pub position_iterations: u32,
    pub mode: AccumulatorMode,
    accumulator: f32,
    frame_time: f32,
    frame_steps: u32,
    total_steps: u64,
}

impl Default for FixedStepper {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

impl FixedStepper {
    pub fn new(step: f32, max_frame_time: f32, mode: AccumulatorMode) -> Self {
        assert!(step > 0.0, "physics step must be positive");
        Self {
            step,
            max_frame_time,
            velocity_iterations: 8,
            position_iterations: 3,
            mode,
            accumulator: 0.0,
            frame_time: 0.0,
            frame_steps: 0,
            total_steps: 0,
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        let mut stepper = Self::new(config.step(), config.max_frame_time, config.accumulator);
        stepper.velocity_iterations = config.velocity_iterations;
        stepper.position_iterations = config.position_iterations;
        stepper
    }

    pub fn accumulator(&self) -> f32 {
        self.accumulator
    }

    /// Steps taken during the last frame.
    pub fn frame_steps(&self) -> u32 {
        self.frame_steps
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Feed one frame's delta into the accumulator.
    pub fn begin_frame(&mut self, dt: f32) {
        self.frame_time = dt.min(self.max_frame_time);
        self.frame_steps = 0;
        self.accumulator += match self.mode {
            AccumulatorMode::Fixed => self.frame_time,
            AccumulatorMode::Legacy => dt,
        };
    }

    /// Take one step off the accumulator if it holds one.
    pub fn consume_step(&mut self) -> bool {
        if self.accumulator < self.step {
            return false;
        }
        self.accumulator -= match self.mode {
            AccumulatorMode::Fixed => self.step,
            AccumulatorMode::Legacy => self.frame_time,
        };
        self.frame_steps += 1;
        self.total_steps += 1;
        true
    }
}

/// Step the physics engine zero or more times and sync awake bodies.
pub fn physics_system(
    mut stepper: ResMut<FixedStepper>,
    mut physics: ResMut<PhysicsWorld>,
    time: Res<WorldTime>,
    mut bodies: Query<(&PhysicsBody, &mut Transform)>,
    mut commands: Commands,
) {
    stepper.begin_frame(time.delta);
    while stepper.consume_step() {
        physics.step(
            stepper.step,
            stepper.velocity_iterations,
            stepper.position_iterations,
        );
        let events = physics.drain_contact_events();
        trigger_foot_contacts(&mut commands, &events);
        for (body, mut transform) in bodies.iter_mut() {
            if !physics.is_awake(body.body) {
                continue;
            }
            transform.position = physics.position(body.body);
            transform.angle = physics.angle(body.body).to_degrees();
        }
    }
}
