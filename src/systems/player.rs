//! Player movement controller.
//!
//! Each player carries a [`PlayerStateMachine`] with three states. Every
//! frame [`update_player`] runs the current state's update (which applies
//! forces and impulses to the body), re-reads the body's velocity and the
//! character's ground contacts, and asks [`next_state`] where to go.
//!
//! | from    | to      | when                                   |
//! |---------|---------|----------------------------------------|
//! | Idle    | Walking | moving and grounded                    |
//! | Idle    | Jumping | moving and airborne                    |
//! | Walking | Jumping | airborne                               |
//! | Walking | Idle    | not moving                             |
//! | Jumping | Idle    | grounded and not moving                |
//! | Jumping | Walking | grounded and moving                    |
//!
//! "Moving" means the squared speed is at least
//! [`PlayerTuning::min_walk_speed_sq`].
//!
//! Ground control (Idle and Walking) switches the friction of every fixture
//! between the stand and walk values, refreshes the friction of every live
//! foot contact, matches the walk speed with a horizontal impulse while a
//! direction is held and jumps with a vertical impulse on the frame the jump
//! key goes down. Air control pushes with a small force up to the air speed
//! cap. Entering a state selects its animation from the start; entering
//! Jumping also drops the friction to zero so the player slides off walls.

use bevy_ecs::prelude::*;
use raylib::prelude::Vector2;

use crate::components::animation::Animation;
use crate::components::character::{Character, Direction};
use crate::components::physicsbody::PhysicsBody;
use crate::components::player::{Player, PlayerState, PlayerStateMachine};
use crate::physics::{BodyHandle, PhysicsEngine, length_sq};
use crate::resources::gameconfig::{GameConfig, PlayerTuning};
use crate::resources::input::InputState;
use crate::resources::physicsworld::PhysicsWorld;

/// What the transition table looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensors {
    pub velocity: Vector2,
    pub foot_contacts: usize,
}

/// Transition table. Returns `state` itself when no rule fires.
pub fn next_state(state: PlayerState, sensors: &Sensors, min_walk_speed_sq: f32) -> PlayerState {
    let moving = length_sq(sensors.velocity) >= min_walk_speed_sq;
    let grounded = sensors.foot_contacts > 0;
    match state {
        PlayerState::Idle if moving && grounded => PlayerState::Walking,
        PlayerState::Idle if moving => PlayerState::Jumping,
        PlayerState::Walking if !grounded => PlayerState::Jumping,
        PlayerState::Walking if !moving => PlayerState::Idle,
        PlayerState::Jumping if grounded && moving => PlayerState::Walking,
        PlayerState::Jumping if grounded => PlayerState::Idle,
        unchanged => unchanged,
    }
}

/// Everything a state action may touch for one player.
pub struct StateContext<'a> {
    pub physics: &'a mut dyn PhysicsEngine,
    pub body: BodyHandle,
    pub character: &'a mut Character,
    pub animation: Option<&'a mut Animation>,
    pub tuning: &'a PlayerTuning,
    pub input: &'a InputState,
}

impl StateContext<'_> {
    pub fn sensors(&self) -> Sensors {
        Sensors {
            velocity: self.physics.linear_velocity(self.body),
            foot_contacts: self.character.foot_contacts_count(),
        }
    }
}

pub fn enter(state: PlayerState, ctx: &mut StateContext) {
    if let Some(animation) = ctx.animation.as_deref_mut() {
        animation.play(state.animation_key());
    }
    if state == PlayerState::Jumping {
        ctx.physics.set_body_friction(ctx.body, 0.0);
    }
}

pub fn exit(_state: PlayerState, _ctx: &mut StateContext) {}

fn face_input(ctx: &mut StateContext) {
    if ctx.input.move_left.active {
        ctx.character.view_direction = Direction::Left;
    }
    if ctx.input.move_right.active {
        ctx.character.view_direction = Direction::Right;
    }
}

fn ground_control(ctx: &mut StateContext) {
    let left = ctx.input.move_left.active;
    let right = ctx.input.move_right.active;
    let tuning = ctx.tuning;

    let friction = if left || right {
        tuning.walk_friction
    } else {
        tuning.stand_friction
    };
    ctx.physics.set_body_friction(ctx.body, friction);
    for contact in ctx.character.foot_contacts() {
        ctx.physics.reset_contact_friction(*contact);
    }

    let velocity = ctx.physics.linear_velocity(ctx.body);
    let mass = ctx.physics.mass(ctx.body);
    if left {
        let impulse = Vector2::new(mass * (-tuning.walk_speed - velocity.x), 0.0);
        ctx.physics.apply_linear_impulse_to_center(ctx.body, impulse, true);
    }
    if right {
        let impulse = Vector2::new(mass * (tuning.walk_speed - velocity.x), 0.0);
        ctx.physics.apply_linear_impulse_to_center(ctx.body, impulse, true);
    }
    if ctx.input.jump.just_pressed {
        let impulse = Vector2::new(0.0, mass * (tuning.jump_speed - velocity.y));
        ctx.physics.apply_linear_impulse_to_center(ctx.body, impulse, true);
    }
}

fn air_control(ctx: &mut StateContext) {
    let velocity = ctx.physics.linear_velocity(ctx.body);
    let push = ctx.physics.mass(ctx.body) * ctx.tuning.air_acceleration;
    let cap = ctx.tuning.air_speed_cap;
    if ctx.input.move_left.active && velocity.x > -cap {
        ctx.physics
            .apply_force_to_center(ctx.body, Vector2::new(-push, 0.0), true);
    }
    if ctx.input.move_right.active && velocity.x < cap {
        ctx.physics
            .apply_force_to_center(ctx.body, Vector2::new(push, 0.0), true);
    }
}

/// Per-frame action of `state`.
pub fn update_state(state: PlayerState, ctx: &mut StateContext) {
    face_input(ctx);
    if state.is_grounded_control() {
        ground_control(ctx);
    } else {
        air_control(ctx);
    }
}

/// Run `exit` of the current state, switch, then `enter` the new one.
pub fn change_state(fsm: &mut PlayerStateMachine, next: PlayerState, ctx: &mut StateContext) {
    exit(fsm.current(), ctx);
    let left = fsm.switch_to(next);
    enter(next, ctx);
    log::debug!("player {} {:?} -> {:?}", fsm.owner(), left, next);
}

/// One controller tick. Returns the new state when a transition happened.
pub fn update_player(fsm: &mut PlayerStateMachine, ctx: &mut StateContext) -> Option<PlayerState> {
    let current = fsm.current();
    update_state(current, ctx);
    let next = next_state(current, &ctx.sensors(), ctx.tuning.min_walk_speed_sq);
    if next == current {
        return None;
    }
    change_state(fsm, next, ctx);
    Some(next)
}

/// Drive every player from this frame's input.
pub fn player_system(
    mut players: Query<(
        &mut Player,
        &PhysicsBody,
        &mut Character,
        Option<&mut Animation>,
    )>,
    mut physics: ResMut<PhysicsWorld>,
    input: Res<InputState>,
    config: Res<GameConfig>,
) {
    for (mut player, body, mut character, mut animation) in players.iter_mut() {
        let mut ctx = StateContext {
            physics: &mut **physics,
            body: body.body,
            character: &mut character,
            animation: animation.as_deref_mut(),
            tuning: &config.player,
            input: &input,
        };
        update_player(&mut player.fsm, &mut ctx);
    }
}
