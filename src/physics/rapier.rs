//! [`rapier2d`] backed engine.
//!
//! [`RapierWorld`] owns a complete rapier pipeline and maps it onto the
//! handle based [`PhysicsEngine`] contract:
//! - every [`BodyHandle`] owns one rapier rigid body
//! - every [`FixtureHandle`] owns one collider, whose `user_data` stores the
//!   fixture id
//! - every collider reports `COLLISION_EVENTS`, received over a
//!   [`crossbeam_channel`] after each step and turned into begin/end
//!   [`ContactEvent`]s keyed by fixture pair
//!
//! Contact friction is mixed like Box2D (`sqrt(fa * fb)`) and cached per
//! contact when it begins. A solver hook feeds the cached value to rapier, so
//! a fixture friction change only reaches a touching pair once
//! [`PhysicsEngine::reset_contact_friction`] refreshes it.
//!
//! Rapier has no separate position solver pass, the `position_iterations`
//! argument of [`PhysicsEngine::step`] is accepted and ignored.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use crossbeam_channel::{Receiver, unbounded};
use rapier2d::prelude::*;
use raylib::prelude::Vector2;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::{
    BodyDef, BodyHandle, BodyKind, ContactEvent, ContactId, ContactPhase, DebugOutline,
    FixtureDef, FixtureHandle, FixtureTag, PhysicsEngine, Shape, length_sq,
};

/// Seconds a body must stay slow before it falls asleep.
const TIME_TO_SLEEP: f32 = 0.5;
const CIRCLE_OUTLINE_SEGMENTS: usize = 12;

/// Fixture pair with the lower handle first.
type PairKey = (FixtureHandle, FixtureHandle);

fn pair_key(a: FixtureHandle, b: FixtureHandle) -> PairKey {
    if a <= b { (a, b) } else { (b, a) }
}

fn mix_friction(a: f32, b: f32) -> f32 {
    (a * b).sqrt()
}

fn to_vector(v: Vector2) -> Vector<Real> {
    vector![v.x, v.y]
}

fn fixture_id(collider: &Collider) -> FixtureHandle {
    FixtureHandle(collider.user_data as u32)
}

struct BodyRecord {
    handle: RigidBodyHandle,
    fixtures: SmallVec<[FixtureHandle; 4]>,
}

struct FixtureRecord {
    body: BodyHandle,
    collider: ColliderHandle,
    shape: Shape,
    is_sensor: bool,
    tag: FixtureTag,
}

struct ContactRecord {
    id: ContactId,
    sensor: bool,
}

/// Per-contact mixed friction handed to the rapier solver.
#[derive(Default)]
struct ContactFriction {
    cached: FxHashMap<PairKey, f32>,
}

impl PhysicsHooks for ContactFriction {
    fn modify_solver_contacts(&self, context: &mut ContactModificationContext) {
        let c1 = &context.colliders[context.collider1];
        let c2 = &context.colliders[context.collider2];
        let friction = self
            .cached
            .get(&pair_key(fixture_id(c1), fixture_id(c2)))
            .copied()
            .unwrap_or_else(|| mix_friction(c1.friction(), c2.friction()));
        for contact in context.solver_contacts.iter_mut() {
            contact.friction = friction;
        }
    }
}

/// Builds the collider shape of a fixture, positioned in body space.
fn collider_builder(shape: &Shape) -> ColliderBuilder {
    match shape {
        Shape::Box {
            half_extents,
            center,
        } => ColliderBuilder::cuboid(half_extents.x, half_extents.y)
            .translation(to_vector(*center)),
        Shape::Circle { radius, center } => {
            ColliderBuilder::ball(*radius).translation(to_vector(*center))
        }
        Shape::Polygon { vertices } => {
            let points: Vec<Point<Real>> = vertices.iter().map(|v| point![v.x, v.y]).collect();
            let n = points.len() as u32;
            let indices: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();
            ColliderBuilder::convex_decomposition(&points, &indices)
        }
        Shape::Chain { vertices, looped } => {
            let points: Vec<Point<Real>> = vertices.iter().map(|v| point![v.x, v.y]).collect();
            let n = points.len() as u32;
            let mut indices: Vec<[u32; 2]> = (1..n).map(|i| [i - 1, i]).collect();
            if *looped && n > 2 {
                indices.push([n - 1, 0]);
            }
            ColliderBuilder::polyline(points, Some(indices))
        }
    }
}

/// Outline points in body space.
fn local_outline(shape: &Shape) -> (Vec<Vector2>, bool) {
    match shape {
        Shape::Box {
            half_extents,
            center,
        } => {
            let c = *center;
            let h = *half_extents;
            (
                vec![
                    Vector2::new(c.x - h.x, c.y - h.y),
                    Vector2::new(c.x + h.x, c.y - h.y),
                    Vector2::new(c.x + h.x, c.y + h.y),
                    Vector2::new(c.x - h.x, c.y + h.y),
                ],
                true,
            )
        }
        Shape::Circle { radius, center } => {
            let points = (0..CIRCLE_OUTLINE_SEGMENTS)
                .map(|i| {
                    let t = i as f32 / CIRCLE_OUTLINE_SEGMENTS as f32 * std::f32::consts::TAU;
                    Vector2::new(center.x + radius * t.cos(), center.y + radius * t.sin())
                })
                .collect();
            (points, true)
        }
        Shape::Polygon { vertices } => (vertices.clone(), true),
        Shape::Chain { vertices, looped } => (vertices.clone(), *looped),
    }
}

/// Rigid-body world backed by rapier.
pub struct RapierWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: ChannelEventCollector,
    collision_recv: Receiver<CollisionEvent>,
    _contact_force_recv: Receiver<ContactForceEvent>,
    friction_hooks: ContactFriction,
    bodies: FxHashMap<BodyHandle, BodyRecord>,
    fixtures: BTreeMap<FixtureHandle, FixtureRecord>,
    contacts: BTreeMap<PairKey, ContactRecord>,
    contact_pairs: FxHashMap<ContactId, PairKey>,
    pending: Vec<ContactEvent>,
    /// Bodies with a user force to clear after the next step.
    forced: SmallVec<[RigidBodyHandle; 4]>,
    next_body: u32,
    next_fixture: u32,
    next_contact: u32,
}

impl RapierWorld {
    pub fn new(gravity: Vector2) -> Self {
        let (collision_send, collision_recv) = unbounded();
        let (contact_force_send, contact_force_recv) = unbounded();
        Self {
            gravity: to_vector(gravity),
            params: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: ChannelEventCollector::new(collision_send, contact_force_send),
            collision_recv,
            _contact_force_recv: contact_force_recv,
            friction_hooks: ContactFriction::default(),
            bodies: FxHashMap::default(),
            fixtures: BTreeMap::new(),
            contacts: BTreeMap::new(),
            contact_pairs: FxHashMap::default(),
            pending: Vec::new(),
            forced: SmallVec::new(),
            next_body: 0,
            next_fixture: 0,
            next_contact: 0,
        }
    }

    /// Number of live contacts, sensor contacts included.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    fn body_record(&self, body: BodyHandle) -> &BodyRecord {
        self.bodies
            .get(&body)
            .unwrap_or_else(|| panic!("unknown physics body {:?}", body))
    }

    fn fixture_record(&self, fixture: FixtureHandle) -> &FixtureRecord {
        self.fixtures
            .get(&fixture)
            .unwrap_or_else(|| panic!("unknown physics fixture {:?}", fixture))
    }

    fn rigid_body(&self, body: BodyHandle) -> &RigidBody {
        &self.rigid_bodies[self.body_record(body).handle]
    }

    fn rigid_body_mut(&mut self, body: BodyHandle) -> &mut RigidBody {
        let handle = self.body_record(body).handle;
        &mut self.rigid_bodies[handle]
    }

    /// Fixture owning a collider, if both are still alive.
    fn fixture_of(&self, collider: ColliderHandle) -> Option<FixtureHandle> {
        let id = fixture_id(self.colliders.get(collider)?);
        self.fixtures.contains_key(&id).then_some(id)
    }

    fn body_pair(&self, key: PairKey) -> (BodyHandle, BodyHandle) {
        let a = self.fixture_record(key.0).body;
        let b = self.fixture_record(key.1).body;
        if a <= b { (a, b) } else { (b, a) }
    }

    fn begin_contact(&mut self, key: PairKey) {
        if self.contacts.contains_key(&key) {
            return;
        }
        let id = ContactId(self.next_contact);
        self.next_contact = self.next_contact.wrapping_add(1);
        let a = self.fixture_record(key.0);
        let b = self.fixture_record(key.1);
        let sensor = a.is_sensor || b.is_sensor;
        let (tag_a, tag_b) = (a.tag, b.tag);
        let mixed = mix_friction(self.friction(key.0), self.friction(key.1));
        self.contacts.insert(key, ContactRecord { id, sensor });
        self.contact_pairs.insert(id, key);
        self.friction_hooks.cached.insert(key, mixed);
        self.pending.push(ContactEvent {
            phase: ContactPhase::Begin,
            contact: id,
            tag_a,
            tag_b,
        });
    }

    fn end_contact(&mut self, key: PairKey) {
        let Some(record) = self.contacts.remove(&key) else {
            return;
        };
        self.contact_pairs.remove(&record.id);
        self.friction_hooks.cached.remove(&key);
        let tag_a = self.fixture_record(key.0).tag;
        let tag_b = self.fixture_record(key.1).tag;
        self.pending.push(ContactEvent {
            phase: ContactPhase::End,
            contact: record.id,
            tag_a,
            tag_b,
        });
    }

    fn collect_collision_events(&mut self) {
        while let Ok(event) = self.collision_recv.try_recv() {
            // colliders of destroyed bodies were already ended
            let (Some(a), Some(b)) = (
                self.fixture_of(event.collider1()),
                self.fixture_of(event.collider2()),
            ) else {
                continue;
            };
            let key = pair_key(a, b);
            if event.started() {
                self.begin_contact(key);
            } else {
                self.end_contact(key);
            }
        }
    }
}

impl PhysicsEngine for RapierWorld {
    fn create_body(&mut self, def: &BodyDef) -> BodyHandle {
        let body_type = match def.kind {
            BodyKind::Static => RigidBodyType::Fixed,
            BodyKind::Kinematic => RigidBodyType::KinematicVelocityBased,
            BodyKind::Dynamic => RigidBodyType::Dynamic,
        };
        let mut builder = RigidBodyBuilder::new(body_type)
            .translation(to_vector(def.position))
            .rotation(def.angle)
            .can_sleep(def.allow_sleep);
        if def.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let mut rigid_body = builder.build();
        rigid_body.activation_mut().time_until_sleep = TIME_TO_SLEEP;

        let handle = BodyHandle(self.next_body);
        self.next_body += 1;
        let rigid_handle = self.rigid_bodies.insert(rigid_body);
        self.bodies.insert(
            handle,
            BodyRecord {
                handle: rigid_handle,
                fixtures: SmallVec::new(),
            },
        );
        handle
    }

    fn destroy_body(&mut self, body: BodyHandle) {
        let Some(record) = self.bodies.remove(&body) else {
            panic!("destroy of unknown or already destroyed physics body {:?}", body);
        };
        let doomed: SmallVec<[PairKey; 8]> = self
            .contacts
            .keys()
            .filter(|(a, b)| record.fixtures.contains(a) || record.fixtures.contains(b))
            .copied()
            .collect();
        for key in doomed {
            self.end_contact(key);
        }
        for fixture in &record.fixtures {
            self.fixtures.remove(fixture);
        }
        self.rigid_bodies.remove(
            record.handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    fn contains_body(&self, body: BodyHandle) -> bool {
        self.bodies.contains_key(&body)
    }

    fn create_fixture(&mut self, body: BodyHandle, def: &FixtureDef) -> FixtureHandle {
        let parent = self.body_record(body).handle;
        let handle = FixtureHandle(self.next_fixture);
        self.next_fixture += 1;

        // sensors never contribute mass
        let density = if def.is_sensor { 0.0 } else { def.density };
        let collider = collider_builder(&def.shape)
            .density(density)
            .friction(def.friction)
            .restitution(def.restitution)
            .restitution_combine_rule(CoefficientCombineRule::Max)
            .sensor(def.is_sensor)
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .active_hooks(ActiveHooks::MODIFY_SOLVER_CONTACTS)
            .user_data(handle.0 as u128)
            .build();
        let collider = self
            .colliders
            .insert_with_parent(collider, parent, &mut self.rigid_bodies);

        self.fixtures.insert(
            handle,
            FixtureRecord {
                body,
                collider,
                shape: def.shape.clone(),
                is_sensor: def.is_sensor,
                tag: def.tag,
            },
        );
        if let Some(record) = self.bodies.get_mut(&body) {
            record.fixtures.push(handle);
        }
        handle
    }

    fn fixtures(&self, body: BodyHandle) -> &[FixtureHandle] {
        &self.body_record(body).fixtures
    }

    fn set_friction(&mut self, fixture: FixtureHandle, friction: f32) {
        let collider = self.fixture_record(fixture).collider;
        if let Some(collider) = self.colliders.get_mut(collider) {
            collider.set_friction(friction);
        }
    }

    fn friction(&self, fixture: FixtureHandle) -> f32 {
        self.colliders[self.fixture_record(fixture).collider].friction()
    }

    fn reset_contact_friction(&mut self, contact: ContactId) {
        let Some(key) = self.contact_pairs.get(&contact).copied() else {
            log::warn!("friction reset of unknown contact {:?}", contact);
            return;
        };
        let bodies = self.body_pair(key);
        let refreshed: SmallVec<[PairKey; 4]> = self
            .contacts
            .iter()
            .filter(|(k, record)| **k == key || (!record.sensor && self.body_pair(**k) == bodies))
            .map(|(k, _)| *k)
            .collect();
        for k in refreshed {
            let mixed = mix_friction(self.friction(k.0), self.friction(k.1));
            self.friction_hooks.cached.insert(k, mixed);
        }
    }

    fn contact_friction(&self, contact: ContactId) -> Option<f32> {
        let key = self.contact_pairs.get(&contact)?;
        self.friction_hooks.cached.get(key).copied()
    }

    fn step(&mut self, dt: f32, velocity_iterations: u32, _position_iterations: u32) {
        if dt <= 0.0 {
            return;
        }
        self.params.dt = dt;
        self.params.num_solver_iterations =
            NonZeroUsize::new(velocity_iterations as usize).unwrap_or(NonZeroUsize::MIN);
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &self.friction_hooks,
            &self.event_collector,
        );
        // rapier keeps user forces until they are reset
        for handle in self.forced.drain(..) {
            if let Some(rigid_body) = self.rigid_bodies.get_mut(handle) {
                rigid_body.reset_forces(false);
            }
        }
        self.collect_collision_events();
    }

    fn position(&self, body: BodyHandle) -> Vector2 {
        let t = self.rigid_body(body).translation();
        Vector2::new(t.x, t.y)
    }

    fn angle(&self, body: BodyHandle) -> f32 {
        self.rigid_body(body).rotation().angle()
    }

    fn linear_velocity(&self, body: BodyHandle) -> Vector2 {
        let v = self.rigid_body(body).linvel();
        Vector2::new(v.x, v.y)
    }

    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vector2) {
        let wake = length_sq(velocity) > 0.0;
        self.rigid_body_mut(body).set_linvel(to_vector(velocity), wake);
    }

    fn angular_velocity(&self, body: BodyHandle) -> f32 {
        self.rigid_body(body).angvel()
    }

    fn set_angular_velocity(&mut self, body: BodyHandle, omega: f32) {
        self.rigid_body_mut(body).set_angvel(omega, omega != 0.0);
    }

    fn mass(&self, body: BodyHandle) -> f32 {
        self.rigid_body(body).mass()
    }

    fn is_awake(&self, body: BodyHandle) -> bool {
        !self.rigid_body(body).is_sleeping()
    }

    fn set_awake(&mut self, body: BodyHandle, awake: bool) {
        let rigid_body = self.rigid_body_mut(body);
        if awake {
            rigid_body.wake_up(true);
        } else {
            rigid_body.sleep();
        }
    }

    fn apply_force_to_center(&mut self, body: BodyHandle, force: Vector2, wake: bool) {
        let handle = self.body_record(body).handle;
        let rigid_body = &mut self.rigid_bodies[handle];
        if !wake && rigid_body.is_sleeping() {
            return;
        }
        rigid_body.add_force(to_vector(force), wake);
        if !self.forced.contains(&handle) {
            self.forced.push(handle);
        }
    }

    fn apply_linear_impulse_to_center(&mut self, body: BodyHandle, impulse: Vector2, wake: bool) {
        let rigid_body = self.rigid_body_mut(body);
        if !wake && rigid_body.is_sleeping() {
            return;
        }
        rigid_body.apply_impulse(to_vector(impulse), wake);
    }

    fn drain_contact_events(&mut self) -> Vec<ContactEvent> {
        std::mem::take(&mut self.pending)
    }

    fn debug_outlines(&self) -> Vec<DebugOutline> {
        let mut outlines = Vec::with_capacity(self.fixtures.len());
        for fixture in self.fixtures.values() {
            let rigid_body = self.rigid_body(fixture.body);
            let pose = rigid_body.position();
            let (local, closed) = local_outline(&fixture.shape);
            let points = local
                .into_iter()
                .map(|p| {
                    let world = pose * point![p.x, p.y];
                    Vector2::new(world.x, world.y)
                })
                .collect();
            outlines.push(DebugOutline {
                points,
                closed,
                is_sensor: fixture.is_sensor,
                awake: !rigid_body.is_sleeping(),
            });
        }
        outlines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;
    const DT: f32 = 1.0 / 60.0;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn world_with_ground() -> (RapierWorld, BodyHandle) {
        let mut world = RapierWorld::new(Vector2::new(0.0, -9.8));
        let ground = world.create_body(&BodyDef::new(BodyKind::Static, Vector2::zero(), 0.0));
        world.create_fixture(
            ground,
            &FixtureDef::new(
                Shape::Chain {
                    vertices: vec![Vector2::new(-10.0, 0.0), Vector2::new(10.0, 0.0)],
                    looped: false,
                },
                0.0,
                0.2,
                0.0,
            )
            .with_tag(FixtureTag::LevelGeometry),
        );
        (world, ground)
    }

    fn drop_box(world: &mut RapierWorld, y: f32) -> BodyHandle {
        let body = world.create_body(
            &BodyDef::new(BodyKind::Dynamic, Vector2::new(0.0, y), 0.0).with_fixed_rotation(true),
        );
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(0.5, 0.5, Vector2::zero()), 1.0, 0.2, 0.0),
        );
        body
    }

    /// Steps `frames` times and returns every contact event produced.
    fn run(world: &mut RapierWorld, frames: usize) -> Vec<ContactEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            world.step(DT, 8, 3);
            events.extend(world.drain_contact_events());
        }
        events
    }

    fn begun(events: &[ContactEvent]) -> Vec<ContactId> {
        events
            .iter()
            .filter(|e| e.phase == ContactPhase::Begin)
            .map(|e| e.contact)
            .collect()
    }

    #[test]
    fn test_mass_from_density_and_area() {
        let mut world = RapierWorld::new(Vector2::zero());
        let body = drop_box(&mut world, 0.0);
        assert!(approx_eq(world.mass(body), 1.0));
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(1.0, 1.0, Vector2::zero()), 2.0, 0.2, 0.0),
        );
        assert!(approx_eq(world.mass(body), 9.0));
    }

    #[test]
    fn test_sensor_does_not_add_mass() {
        let mut world = RapierWorld::new(Vector2::zero());
        let body = drop_box(&mut world, 0.0);
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(2.0, 2.0, Vector2::zero()), 5.0, 0.0, 0.0).sensor(),
        );
        assert!(approx_eq(world.mass(body), 1.0));
    }

    #[test]
    fn test_gravity_integration() {
        let mut world = RapierWorld::new(Vector2::new(0.0, -10.0));
        let body = drop_box(&mut world, 5.0);
        world.step(0.5, 8, 3);
        assert!((world.linear_velocity(body).y + 5.0).abs() < 1e-3);
        let y = world.position(body).y;
        assert!(y < 5.0 && y > 2.0, "fell to {}", y);
    }

    #[test]
    fn test_box_lands_on_chain_ground() {
        let (mut world, _) = world_with_ground();
        let body = drop_box(&mut world, 1.0);
        run(&mut world, 120);
        let pos = world.position(body);
        assert!((pos.y - 0.5).abs() < 0.02, "resting height was {}", pos.y);
        assert!(world.linear_velocity(body).y.abs() < 1e-2);
    }

    #[test]
    fn test_box_rests_on_slope_surface() {
        let mut world = RapierWorld::new(Vector2::new(0.0, -9.8));
        let ground = world.create_body(&BodyDef::new(BodyKind::Static, Vector2::zero(), 0.0));
        world.create_fixture(
            ground,
            &FixtureDef::new(
                Shape::Polygon {
                    vertices: vec![
                        Vector2::new(0.0, 0.0),
                        Vector2::new(10.0, 0.0),
                        Vector2::new(10.0, 5.0),
                    ],
                },
                0.0,
                1.0,
                0.0,
            ),
        );
        let body = world.create_body(
            &BodyDef::new(BodyKind::Dynamic, Vector2::new(2.0, 2.5), 0.0).with_fixed_rotation(true),
        );
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(0.5, 0.5, Vector2::zero()), 1.0, 1.0, 0.0),
        );
        run(&mut world, 120);

        // slope height is x / 2, the lower right corner of the box touches it
        let pos = world.position(body);
        let surface = (pos.x + 0.5) / 2.0;
        assert!(pos.y < 2.5, "box floats at {}", pos.y);
        assert!(
            (pos.y - (surface + 0.5)).abs() < 0.1,
            "box at {:?}, surface {}",
            pos,
            surface
        );
    }

    #[test]
    fn test_resting_body_falls_asleep_and_wakes_on_impulse() {
        let (mut world, _) = world_with_ground();
        let body = drop_box(&mut world, 0.6);
        run(&mut world, 120);
        assert!(!world.is_awake(body));
        world.apply_linear_impulse_to_center(body, Vector2::new(1.0, 0.0), true);
        assert!(world.is_awake(body));
        assert!((world.linear_velocity(body).x - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_impulse_without_wake_is_ignored_while_asleep() {
        let mut world = RapierWorld::new(Vector2::zero());
        let body = drop_box(&mut world, 0.0);
        world.set_awake(body, false);
        world.apply_linear_impulse_to_center(body, Vector2::new(1.0, 0.0), false);
        assert!(!world.is_awake(body));
        assert!(approx_eq(world.linear_velocity(body).x, 0.0));
    }

    #[test]
    fn test_force_applies_for_one_step_only() {
        let mut world = RapierWorld::new(Vector2::zero());
        let body = drop_box(&mut world, 0.0);
        world.apply_force_to_center(body, Vector2::new(2.0, 0.0), true);
        world.step(1.0, 8, 3);
        assert!((world.linear_velocity(body).x - 2.0).abs() < 1e-3);
        world.step(1.0, 8, 3);
        assert!((world.linear_velocity(body).x - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_angular_velocity_turns_free_body() {
        let mut world = RapierWorld::new(Vector2::zero());
        let body = world.create_body(&BodyDef::new(BodyKind::Dynamic, Vector2::zero(), 0.0));
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(0.5, 0.5, Vector2::zero()), 1.0, 0.2, 0.0),
        );
        world.set_angular_velocity(body, 1.0);
        run(&mut world, 30);
        assert!((world.angular_velocity(body) - 1.0).abs() < 1e-3);
        assert!((world.angle(body) - 0.5).abs() < 1e-2);
    }

    #[test]
    fn test_high_friction_stops_sliding() {
        let (mut world, _) = world_with_ground();
        let body = drop_box(&mut world, 0.5);
        world.set_body_friction(body, 100.0);
        world.set_linear_velocity(body, Vector2::new(1.5, 0.0));
        run(&mut world, 10);
        assert!(world.linear_velocity(body).x.abs() < 1e-2);
    }

    #[test]
    fn test_low_friction_keeps_sliding() {
        let (mut world, _) = world_with_ground();
        let body = drop_box(&mut world, 0.5);
        world.set_body_friction(body, 0.0);
        world.set_linear_velocity(body, Vector2::new(1.5, 0.0));
        run(&mut world, 10);
        assert!((world.linear_velocity(body).x - 1.5).abs() < 1e-2);
    }

    #[test]
    fn test_sensor_contact_begin_and_end_events() {
        let (mut world, _) = world_with_ground();
        let owner = bevy_ecs::world::World::new().spawn_empty().id();
        let body = world.create_body(&BodyDef::new(
            BodyKind::Dynamic,
            Vector2::new(0.0, 0.5),
            0.0,
        ));
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(0.5, 0.5, Vector2::zero()), 1.0, 0.2, 0.0),
        );
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(0.1, 0.05, Vector2::new(0.0, -0.5)), 0.0, 0.0, 0.0)
                .sensor()
                .with_tag(FixtureTag::FootSensor { owner }),
        );
        let events = run(&mut world, 2);
        let begins: Vec<_> = events
            .iter()
            .filter(|e| e.phase == ContactPhase::Begin)
            .filter(|e| {
                e.tag_a == FixtureTag::FootSensor { owner }
                    || e.tag_b == FixtureTag::FootSensor { owner }
            })
            .collect();
        assert_eq!(begins.len(), 1);
        let sensor_contact = begins[0].contact;

        // lift the body well clear of the ground
        world.set_linear_velocity(body, Vector2::new(0.0, 200.0));
        let events = run(&mut world, 3);
        assert!(
            events
                .iter()
                .any(|e| e.phase == ContactPhase::End && e.contact == sensor_contact)
        );
        assert!(world.contact_friction(sensor_contact).is_none());
        assert!(world.drain_contact_events().is_empty());
    }

    #[test]
    fn test_destroy_body_ends_live_contacts() {
        let (mut world, _) = world_with_ground();
        let body = drop_box(&mut world, 0.5);
        let started = begun(&run(&mut world, 10));
        assert_eq!(started.len(), 1);
        world.destroy_body(body);
        let ended = world.drain_contact_events();
        assert_eq!(ended.len(), 1);
        assert_eq!(ended[0].phase, ContactPhase::End);
        assert_eq!(ended[0].contact, started[0]);
        assert_eq!(world.contact_count(), 0);
        assert!(!world.contains_body(body));

        // rapier reports the removed pair on the next step; it is already gone
        assert!(run(&mut world, 2).is_empty());
    }

    #[test]
    #[should_panic(expected = "already destroyed")]
    fn test_double_destroy_panics() {
        let mut world = RapierWorld::new(Vector2::zero());
        let body = drop_box(&mut world, 0.0);
        world.destroy_body(body);
        world.destroy_body(body);
    }

    #[test]
    fn test_reset_contact_friction_picks_up_new_fixture_friction() {
        let (mut world, _) = world_with_ground();
        let body = drop_box(&mut world, 0.5);
        let contact = begun(&run(&mut world, 10))[0];
        assert!(approx_eq(world.contact_friction(contact).unwrap(), 0.2));

        world.set_body_friction(body, 0.8);
        assert!(approx_eq(world.contact_friction(contact).unwrap(), 0.2));
        world.reset_contact_friction(contact);
        assert!(approx_eq(world.contact_friction(contact).unwrap(), 0.4));
    }

    #[test]
    fn test_solver_uses_cached_contact_friction() {
        let (mut world, ground) = world_with_ground();
        world.set_body_friction(ground, 1.0);
        let body = drop_box(&mut world, 0.5);
        world.set_body_friction(body, 1.0);
        let contact = begun(&run(&mut world, 30))[0];

        // the live contact keeps its cached friction and still brakes the slide
        world.set_body_friction(body, 0.0);
        world.set_linear_velocity(body, Vector2::new(1.0, 0.0));
        run(&mut world, 10);
        assert!(
            world.linear_velocity(body).x < 0.5,
            "slid at {}",
            world.linear_velocity(body).x
        );

        world.reset_contact_friction(contact);
        assert!(approx_eq(world.contact_friction(contact).unwrap(), 0.0));
        world.set_linear_velocity(body, Vector2::new(1.0, 0.0));
        run(&mut world, 10);
        assert!((world.linear_velocity(body).x - 1.0).abs() < 1e-2);
    }

    #[test]
    fn test_sensor_reset_refreshes_solid_contacts_of_the_same_bodies() {
        let (mut world, _) = world_with_ground();
        let owner = bevy_ecs::world::World::new().spawn_empty().id();
        let body = drop_box(&mut world, 0.5);
        let sensor = world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(0.1, 0.05, Vector2::new(0.0, -0.5)), 0.0, 0.0, 0.0)
                .sensor()
                .with_tag(FixtureTag::FootSensor { owner }),
        );
        let events = run(&mut world, 10);
        let foot_tag = FixtureTag::FootSensor { owner };
        let foot = events
            .iter()
            .find(|e| e.tag_a == foot_tag || e.tag_b == foot_tag)
            .map(|e| e.contact)
            .unwrap();
        let solid = begun(&events).into_iter().find(|c| *c != foot).unwrap();

        world.set_body_friction(body, 0.8);
        assert!(approx_eq(world.friction(sensor), 0.8));
        world.reset_contact_friction(foot);
        assert!(approx_eq(world.contact_friction(foot).unwrap(), 0.4));
        assert!(approx_eq(world.contact_friction(solid).unwrap(), 0.4));
    }

    #[test]
    fn test_debug_outlines_cover_every_fixture() {
        let (mut world, _) = world_with_ground();
        let body = drop_box(&mut world, 2.0);
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::circle(0.25, Vector2::zero()), 1.0, 0.2, 0.0),
        );
        let outlines = world.debug_outlines();
        assert_eq!(outlines.len(), 3);
        assert!(!outlines[0].closed);
        assert_eq!(outlines[1].points.len(), 4);
        assert_eq!(outlines[2].points.len(), CIRCLE_OUTLINE_SEGMENTS);
    }

    #[test]
    fn test_debug_outline_follows_body_rotation() {
        let mut world = RapierWorld::new(Vector2::zero());
        let body = world.create_body(&BodyDef::new(
            BodyKind::Dynamic,
            Vector2::new(1.0, 0.0),
            std::f32::consts::FRAC_PI_2,
        ));
        world.create_fixture(
            body,
            &FixtureDef::new(Shape::boxed(1.0, 0.5, Vector2::zero()), 1.0, 0.2, 0.0),
        );
        let outline = &world.debug_outlines()[0];
        // (-1, -0.5) turned a quarter counter-clockwise, then moved to the body
        let corner = outline.points[0];
        assert!((corner.x - 1.5).abs() < 1e-3, "corner {:?}", corner);
        assert!((corner.y + 1.0).abs() < 1e-3, "corner {:?}", corner);
    }
}
