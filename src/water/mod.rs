pub(crate) mod components;
pub(crate) mod minimap;
pub(crate) mod solver;
pub(crate) mod systems;

use crate::core::state::AppState;
use crate::terrain::systems::spawn_terrain;
use bevy::prelude::*;
use bevy_water::{SolveMaterial, WaterMaterial};
use minimap::MinimapMaterial;

pub(crate) struct WaterPlugin;

impl Plugin for WaterPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            MaterialPlugin::<WaterMaterial>::default(),
            MaterialPlugin::<SolveMaterial>::default(),
            MaterialPlugin::<MinimapMaterial>::default(),
        ))
        .add_systems(
            OnEnter(AppState::Preparing),
            (
                solver::setup_height_field_solver,
                // The water material samples the baked terrain heights
                systems::spawn_water.after(spawn_terrain),
                systems::spawn_fog_volume,
                minimap::setup_minimap,
            )
                .chain(),
        )
        .add_systems(
            Update,
            solver::finish_height_field_solve.run_if(in_state(AppState::Preparing)),
        )
        .add_systems(
            Update,
            (
                systems::advance_water,
                systems::track_fog_volume,
                systems::toggle_wireframe,
                minimap::update_minimap_viewport,
            )
                .run_if(in_state(AppState::Running)),
        );
    }
}
