use bevy::prelude::*;

/// Marker for the animated water surface mesh.
#[derive(Component)]
pub struct WaterSurface;

/// Inward-facing translucent box that follows the camera so fog reads the
/// same from every viewing angle.
#[derive(Component)]
pub struct FogVolume;

/// Camera driving the one-shot offscreen solve.
#[derive(Component)]
pub struct SolverCamera;

/// Orthographic camera rendering the minimap viewport.
#[derive(Component)]
pub struct MinimapCamera;

/// Explicit minimap geometry - which screen-space rect the camera draws
/// into. No captured state; the update system reads this and the window.
#[derive(Component, Debug, Clone, Copy)]
pub struct MinimapRenderer {
    /// Square edge length, logical pixels.
    pub size: u32,
    /// Inset from the window corner, logical pixels.
    pub padding: u32,
}

impl Default for MinimapRenderer {
    fn default() -> Self {
        Self {
            size: 256,
            padding: 10,
        }
    }
}
