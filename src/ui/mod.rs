pub mod components;
mod systems;

use crate::core::state::AppState;
use bevy::prelude::*;
use systems::*;

pub struct UIPlugin;

impl Plugin for UIPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Loading), spawn_loading_screen)
            .add_systems(
                Update,
                update_loading_bar.run_if(
                    in_state(AppState::Loading).or(in_state(AppState::Preparing)),
                ),
            )
            .add_systems(OnEnter(AppState::Running), despawn_loading_screen);
    }
}
