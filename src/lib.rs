mod config;
mod core;
mod loading;
mod terrain;
mod ui;
mod water;

use crate::config::{CONFIG_PATH, SceneConfig};
use crate::core::camera::CameraPlugin;
use crate::core::state::AppState;
use crate::loading::LoadingPlugin;
use crate::terrain::TerrainPlugin;
use crate::ui::UIPlugin;
use crate::water::WaterPlugin;

use bevy::app::App;
#[cfg(debug_assertions)]
use bevy::diagnostic::{FrameTimeDiagnosticsPlugin, LogDiagnosticsPlugin};
use bevy::pbr::wireframe::WireframePlugin;
use bevy::prelude::*;

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<AppState>()
            .insert_resource(SceneConfig::load_or_default(CONFIG_PATH))
            // Per-frame system errors are logged and the frame skipped;
            // they never take the loop down.
            .set_error_handler(bevy::ecs::error::warn)
            .add_plugins((
                CameraPlugin,
                LoadingPlugin,
                TerrainPlugin,
                WaterPlugin,
                UIPlugin,
                WireframePlugin::default(),
            ));

        #[cfg(debug_assertions)]
        {
            app.add_plugins((
                LogDiagnosticsPlugin::default(),
                FrameTimeDiagnosticsPlugin::default(),
            ));
        }
    }
}
