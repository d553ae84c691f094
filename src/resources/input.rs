//! Per-frame keyboard input resource.
//!
//! Captures the keys the game cares about and exposes them to systems via the
//! [`InputState`] resource. Raylib is polled once per frame by the first
//! scheduled system, so every later system in a frame sees the same snapshot.
use bevy_ecs::prelude::*;
use raylib::prelude::*;

#[derive(Debug, Clone, Copy)]
/// Boolean key state with an associated keyboard binding.
pub struct BoolState {
    /// Whether the key is currently held.
    pub active: bool,
    /// Whether the key went down this frame.
    pub just_pressed: bool,
    /// Whether the key went up this frame.
    pub just_released: bool,

    /// The key bound to this action.
    pub key_binding: KeyboardKey,
}

impl BoolState {
    pub fn bound_to(key_binding: KeyboardKey) -> Self {
        Self {
            key_binding,
            ..Self::default()
        }
    }

    /// Store one polled sample.
    pub fn update(&mut self, down: bool, pressed: bool, released: bool) {
        self.active = down;
        self.just_pressed = pressed;
        self.just_released = released;
    }

    /// Emulate a key transition from the previous sample, for scripted input.
    pub fn set_held(&mut self, down: bool) {
        let was = self.active;
        self.update(down, down && !was, !down && was);
    }
}

/// Resource capturing the per-frame keyboard state relevant to gameplay.
#[derive(Resource, Debug, Clone)]
pub struct InputState {
    pub move_left: BoolState,
    pub move_right: BoolState,
    pub jump: BoolState,
    // Camera
    pub zoom_out: BoolState,
    pub zoom_in: BoolState,
    pub mode_debug: BoolState,
}

impl InputState {
    /// Every binding, for polling loops.
    pub fn bindings_mut(&mut self) -> [&mut BoolState; 6] {
        [
            &mut self.move_left,
            &mut self.move_right,
            &mut self.jump,
            &mut self.zoom_out,
            &mut self.zoom_in,
            &mut self.mode_debug,
        ]
    }
}

impl Default for BoolState {
    fn default() -> Self {
        Self {
            active: false,
            just_pressed: false,
            just_released: false,
            key_binding: KeyboardKey::KEY_NULL,
        }
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            move_left: BoolState::bound_to(KeyboardKey::KEY_A),
            move_right: BoolState::bound_to(KeyboardKey::KEY_D),
            jump: BoolState::bound_to(KeyboardKey::KEY_SPACE),
            zoom_out: BoolState::bound_to(KeyboardKey::KEY_Z),
            zoom_in: BoolState::bound_to(KeyboardKey::KEY_X),
            mode_debug: BoolState::bound_to(KeyboardKey::KEY_F11),
        }
    }
}
