//! Player movement state machine data.
//!
//! The behaviour of each state (enter/update/exit and the transition table)
//! lives in [`crate::systems::player`]; this module only holds the
//! bookkeeping that is attached to the player entity.

use bevy_ecs::prelude::{Component, Entity};

/// Movement state of a player. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerState {
    #[default]
    Idle,
    Walking,
    Jumping,
}

impl PlayerState {
    /// Key of the animation played while in this state.
    pub fn animation_key(self) -> &'static str {
        match self {
            PlayerState::Idle => "player_idle",
            PlayerState::Walking => "player_walk",
            PlayerState::Jumping => "player_jump",
        }
    }

    /// Idle and Walking apply ground control, Jumping applies air control.
    pub fn is_grounded_control(self) -> bool {
        matches!(self, PlayerState::Idle | PlayerState::Walking)
    }
}

/// State machine bound to its owner entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStateMachine {
    owner: Entity,
    current: PlayerState,
    previous: Option<PlayerState>,
}

impl PlayerStateMachine {
    /// Machine in `initial` state. No enter action is run for it.
    pub fn new(owner: Entity, initial: PlayerState) -> Self {
        Self {
            owner,
            current: initial,
            previous: None,
        }
    }

    pub fn owner(&self) -> Entity {
        self.owner
    }

    pub fn current(&self) -> PlayerState {
        self.current
    }

    pub fn previous(&self) -> Option<PlayerState> {
        self.previous
    }

    /// Record a transition. Callers run the exit/enter actions around it.
    pub fn switch_to(&mut self, next: PlayerState) -> PlayerState {
        let left = self.current;
        self.previous = Some(left);
        self.current = next;
        left
    }
}

#[derive(Component, Debug, Clone)]
pub struct Player {
    pub fsm: PlayerStateMachine,
}

impl Player {
    pub fn new(owner: Entity) -> Self {
        Self {
            fsm: PlayerStateMachine::new(owner, PlayerState::Idle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::world::World;

    #[test]
    fn test_player_starts_idle_bound_to_owner() {
        let mut world = World::new();
        let owner = world.spawn_empty().id();
        let player = Player::new(owner);
        assert_eq!(player.fsm.current(), PlayerState::Idle);
        assert_eq!(player.fsm.owner(), owner);
        assert_eq!(player.fsm.previous(), None);
    }

    #[test]
    fn test_switch_to_records_previous() {
        let mut world = World::new();
        let owner = world.spawn_empty().id();
        let mut fsm = PlayerStateMachine::new(owner, PlayerState::Idle);
        assert_eq!(fsm.switch_to(PlayerState::Walking), PlayerState::Idle);
        assert_eq!(fsm.current(), PlayerState::Walking);
        assert_eq!(fsm.previous(), Some(PlayerState::Idle));
    }

    #[test]
    fn test_animation_keys() {
        assert_eq!(PlayerState::Idle.animation_key(), "player_idle");
        assert_eq!(PlayerState::Walking.animation_key(), "player_walk");
        assert_eq!(PlayerState::Jumping.animation_key(), "player_jump");
        assert!(PlayerState::Walking.is_grounded_control());
        assert!(!PlayerState::Jumping.is_grounded_control());
    }
}
