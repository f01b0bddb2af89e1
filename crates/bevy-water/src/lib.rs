//! # Bevy Water Crate
//!
//! An animated water surface for Bevy 0.17: a fixed, ordered set of
//! sinusoidal wave components drives per-vertex displacement in a custom
//! material, optionally combined with a pre-solved height-field texture.
//!
//! ## Usage
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_water::*;
//!
//! fn setup(
//!     mut commands: Commands,
//!     mut meshes: ResMut<Assets<Mesh>>,
//!     mut materials: ResMut<Assets<WaterMaterial>>,
//! ) {
//!     let config = WaterConfig::default();
//!     let waves = WaveSet::default_for(&config);
//!     let mesh = WaterMeshBuilder::new(&config).build();
//!
//!     let mut params = WaterParams::default();
//!     params.write_waves(&waves);
//!
//!     commands.spawn((
//!         Mesh3d(meshes.add(mesh)),
//!         MeshMaterial3d(materials.add(WaterMaterial {
//!             params,
//!             ..Default::default()
//!         })),
//!     ));
//! }
//! ```

use bevy::math::Vec2;

pub mod height_field;
pub mod material;
pub mod mesh;
pub mod waves;

pub use material::{GpuWave, SolveMaterial, WaterMaterial, WaterParams};
pub use mesh::WaterMeshBuilder;
pub use waves::{MAX_WAVES, WaterSurfaceState, WaveDescriptor, WaveError, WaveSet};

/// Configuration for a water surface - your game provides this
#[derive(Debug, Clone, Copy)]
pub struct WaterConfig {
    /// Physical width/depth of the simulated patch
    pub domain_size: f32,
    /// Vertices per side of the water grid
    pub resolution: u32,
    /// Wind speed in m/s; scales the default wave set's propagation speeds
    pub wind_speed: f32,
    /// Wind direction; rotates the default wave set. Must be normalizable,
    /// callers should default degenerate input before constructing waves
    pub wind_direction: Vec2,
    /// Water column depth at which the surface reads as fully deep
    pub max_depth: f32,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            domain_size: 2048.0,
            resolution: 1024,
            wind_speed: DEFAULT_WIND_SPEED,
            wind_direction: Vec2::X,
            max_depth: 10.0,
        }
    }
}

/// Wind speed the default wave set was tuned at.
pub const DEFAULT_WIND_SPEED: f32 = 20.0;
