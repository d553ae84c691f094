//! Input systems.
//!
//! - [`update_input_state`] reads hardware input from raylib each frame and
//!   writes the results into [`InputState`].
//! - [`debug_toggle_system`] flips [`DebugMode`] when the debug key goes down.
use bevy_ecs::prelude::*;

use crate::resources::debugmode::DebugMode;
use crate::resources::input::InputState;

/// Poll raylib for every bound key.
pub fn update_input_state(mut input: ResMut<InputState>, rl: NonSend<raylib::RaylibHandle>) {
    for state in input.bindings_mut() {
        let key = state.key_binding;
        state.update(
            rl.is_key_down(key),
            rl.is_key_pressed(key),
            rl.is_key_released(key),
        );
    }
}

pub fn debug_toggle_system(
    input: Res<InputState>,
    debug: Option<Res<DebugMode>>,
    mut commands: Commands,
) {
    if !input.mode_debug.just_pressed {
        return;
    }
    if debug.is_some() {
        log::info!("debug mode off");
        commands.remove_resource::<DebugMode>();
    } else {
        log::info!("debug mode on");
        commands.insert_resource(DebugMode {});
    }
}
