pub(crate) mod components;
pub(crate) mod systems;

use crate::core::camera::systems::*;
use crate::core::state::AppState;
use bevy::prelude::*;

pub(crate) struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (spawn_camera, spawn_lights))
            .add_systems(OnEnter(AppState::Preparing), attach_scene_effects)
            .add_systems(
                PostUpdate,
                camera_control.run_if(in_state(AppState::Running)),
            );
    }
}
