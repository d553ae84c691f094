//! Rigid-body physics contract.
//!
//! Gameplay code never talks to a concrete solver. It goes through the
//! [`PhysicsEngine`] trait: bodies and fixtures are created and destroyed by
//! handle, forces and impulses are applied to body centres, the world is
//! stepped with a fixed delta and per-contact begin/end events are drained
//! after each step.
//!
//! Submodules:
//! - [`rapier`] – [`rapier2d`] backed engine used by the game binary and the
//!   tests
//!
//! Handles are plain copyable ids. Passing a handle that the engine does not
//! know (never created, or already destroyed) is a programmer error and the
//! engine panics.

pub mod rapier;

use bevy_ecs::prelude::Entity;
use raylib::prelude::Vector2;

/// Opaque id of a rigid body inside a [`PhysicsEngine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyHandle(pub u32);

/// Opaque id of a fixture (collision shape) attached to a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FixtureHandle(pub u32);

/// Opaque id of a contact between two fixtures.
///
/// A contact keeps its id from the begin event until the matching end event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContactId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Static,
    Kinematic,
    Dynamic,
}

/// Parameters for [`PhysicsEngine::create_body`].
#[derive(Debug, Clone, Copy)]
pub struct BodyDef {
    pub kind: BodyKind,
    pub position: Vector2,
    /// Initial angle in radians.
    pub angle: f32,
    pub fixed_rotation: bool,
    pub allow_sleep: bool,
}

impl BodyDef {
    pub fn new(kind: BodyKind, position: Vector2, angle: f32) -> Self {
        Self {
            kind,
            position,
            angle,
            fixed_rotation: false,
            allow_sleep: true,
        }
    }

    /// Body definition from a gameplay pose (angle in degrees).
    pub fn from_pose(kind: BodyKind, position: Vector2, angle_degrees: f32) -> Self {
        Self::new(kind, position, angle_degrees.to_radians())
    }

    pub fn with_fixed_rotation(mut self, fixed: bool) -> Self {
        self.fixed_rotation = fixed;
        self
    }

    pub fn with_allow_sleep(mut self, allow: bool) -> Self {
        self.allow_sleep = allow;
        self
    }
}

/// Collision geometry in body-local coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned box given by half extents around `center`.
    Box { half_extents: Vector2, center: Vector2 },
    Circle { radius: f32, center: Vector2 },
    /// Convex polygon vertex loop.
    Polygon { vertices: Vec<Vector2> },
    /// Open or closed chain of line segments.
    Chain { vertices: Vec<Vector2>, looped: bool },
}

impl Shape {
    pub fn boxed(half_width: f32, half_height: f32, center: Vector2) -> Self {
        Shape::Box {
            half_extents: Vector2::new(half_width, half_height),
            center,
        }
    }

    pub fn circle(radius: f32, center: Vector2) -> Self {
        Shape::Circle { radius, center }
    }

    /// Area used for mass computation. Chains have no area.
    pub fn area(&self) -> f32 {
        match self {
            Shape::Box { half_extents, .. } => 4.0 * half_extents.x * half_extents.y,
            Shape::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
            Shape::Polygon { vertices } => {
                // shoelace
                let n = vertices.len();
                let mut twice = 0.0;
                for i in 0..n {
                    let a = vertices[i];
                    let b = vertices[(i + 1) % n];
                    twice += a.x * b.y - b.x * a.y;
                }
                (twice * 0.5).abs()
            }
            Shape::Chain { .. } => 0.0,
        }
    }
}

/// User data carried by a fixture and echoed back in contact events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixtureTag {
    #[default]
    None,
    /// Ground sensor under a character's feet.
    FootSensor { owner: Entity },
    /// Static collision geometry generated from a level.
    LevelGeometry,
}

/// Parameters for [`PhysicsEngine::create_fixture`].
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDef {
    pub shape: Shape,
    pub density: f32,
    pub friction: f32,
    pub restitution: f32,
    pub is_sensor: bool,
    pub tag: FixtureTag,
}

impl FixtureDef {
    pub fn new(shape: Shape, density: f32, friction: f32, restitution: f32) -> Self {
        Self {
            shape,
            density,
            friction,
            restitution,
            is_sensor: false,
            tag: FixtureTag::None,
        }
    }

    pub fn sensor(mut self) -> Self {
        self.is_sensor = true;
        self
    }

    pub fn with_tag(mut self, tag: FixtureTag) -> Self {
        self.tag = tag;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// A begin or end notification for one contact, with the tags of both fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub phase: ContactPhase,
    pub contact: ContactId,
    pub tag_a: FixtureTag,
    pub tag_b: FixtureTag,
}

/// World-space outline of a fixture, for debug drawing.
#[derive(Debug, Clone, PartialEq)]
pub struct DebugOutline {
    pub points: Vec<Vector2>,
    pub closed: bool,
    pub is_sensor: bool,
    pub awake: bool,
}

/// Black-box rigid-body engine.
///
/// The engine is owned by the [`PhysicsWorld`](crate::resources::physicsworld::PhysicsWorld)
/// resource and only mutated from the frame thread. Stepping is infallible:
/// an engine that cannot continue must panic.
pub trait PhysicsEngine: Send + Sync {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle;

    /// Destroy a body and all its fixtures. Live contacts of the body produce
    /// end events. Destroying the same body twice panics.
    fn destroy_body(&mut self, body: BodyHandle);

    fn contains_body(&self, body: BodyHandle) -> bool;

    fn create_fixture(&mut self, body: BodyHandle, def: &FixtureDef) -> FixtureHandle;

    fn fixtures(&self, body: BodyHandle) -> &[FixtureHandle];

    fn set_friction(&mut self, fixture: FixtureHandle, friction: f32);

    fn friction(&self, fixture: FixtureHandle) -> f32;

    /// Recompute the cached mixed friction of a contact from its fixtures.
    ///
    /// Every contact caches `sqrt(friction_a * friction_b)` when it begins and
    /// the solver keeps using that value. Changing a fixture's friction has no
    /// effect on live contacts until they are reset. Resetting a contact also
    /// refreshes the solid contacts between the same two bodies, so resetting a
    /// foot sensor contact refreshes the feet standing on that ground.
    fn reset_contact_friction(&mut self, contact: ContactId);

    /// Cached mixed friction of a live contact, `None` once it has ended.
    fn contact_friction(&self, contact: ContactId) -> Option<f32>;

    fn step(&mut self, dt: f32, velocity_iterations: u32, position_iterations: u32);

    fn position(&self, body: BodyHandle) -> Vector2;

    /// Body angle in radians.
    fn angle(&self, body: BodyHandle) -> f32;

    fn linear_velocity(&self, body: BodyHandle) -> Vector2;

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vector2);

    /// Angular velocity in radians per second.
    fn angular_velocity(&self, body: BodyHandle) -> f32;

    fn set_angular_velocity(&mut self, body: BodyHandle, omega: f32);

    fn mass(&self, body: BodyHandle) -> f32;

    fn is_awake(&self, body: BodyHandle) -> bool;

    fn set_awake(&mut self, body: BodyHandle, awake: bool);

    /// Force accumulated until the next step, then cleared.
    fn apply_force_to_center(&mut self, body: BodyHandle, force: Vector2, wake: bool);

    /// Impulse that changes the velocity immediately.
    fn apply_linear_impulse_to_center(&mut self, body: BodyHandle, impulse: Vector2, wake: bool);

    /// Take every contact event produced since the last drain, in order.
    fn drain_contact_events(&mut self) -> Vec<ContactEvent>;

    fn debug_outlines(&self) -> Vec<DebugOutline>;

    /// Set the friction of every fixture on `body`.
    fn set_body_friction(&mut self, body: BodyHandle, friction: f32) {
        let fixtures: smallvec::SmallVec<[FixtureHandle; 4]> =
            self.fixtures(body).iter().copied().collect();
        for fixture in fixtures {
            self.set_friction(fixture, friction);
        }
    }
}

/// Squared length of a vector.
pub fn length_sq(v: Vector2) -> f32 {
    v.x * v.x + v.y * v.y
}
