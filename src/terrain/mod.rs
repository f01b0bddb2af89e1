pub(crate) mod systems;

use crate::core::state::AppState;
use bevy::prelude::*;
use systems::spawn_terrain;

pub(crate) struct TerrainPlugin;

impl Plugin for TerrainPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(AppState::Preparing), spawn_terrain);
    }
}
