use crate::water::components::{MinimapCamera, MinimapRenderer};
use crate::water::solver::HeightFieldSolve;
use bevy::asset::Asset;
use bevy::camera::Viewport;
use bevy::camera::visibility::RenderLayers;
use bevy::camera::{ClearColorConfig, ScalingMode};
use bevy::image::Image;
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::render::render_resource::AsBindGroup;
use bevy::shader::ShaderRef;
use bevy::window::{PrimaryWindow, WindowResized};

/// Render layer reserved for the minimap plane and camera.
pub const MINIMAP_LAYER: usize = 2;

/// Unlit visualization of the solved height field. A dedicated material
/// because the float texture is non-filterable and StandardMaterial's
/// samplers are not.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct MinimapMaterial {
    /// Height mapped to full color range at this magnitude.
    #[uniform(0)]
    pub height_scale: f32,
    #[texture(1, filterable = false)]
    #[sampler(2, sampler_type = "non_filtering")]
    pub height_field: Handle<Image>,
}

impl Material for MinimapMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/minimap.wgsl".into()
    }
}

/// Project the solved texture onto a plane far above the scene and point a
/// small orthographic camera at it, scissored to a corner viewport.
pub fn setup_minimap(
    mut commands: Commands,
    solve: Res<HeightFieldSolve>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<MinimapMaterial>>,
    window: Query<&Window, With<PrimaryWindow>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(50.0, 50.0))),
        MeshMaterial3d(materials.add(MinimapMaterial {
            height_scale: 1.0,
            height_field: solve.texture.clone(),
        })),
        Transform::from_xyz(0.0, 1950.0, 0.0),
        RenderLayers::layer(MINIMAP_LAYER),
    ));

    let renderer = MinimapRenderer::default();
    let viewport = window
        .single()
        .ok()
        .map(|w| corner_viewport(w.physical_width(), w.physical_height(), &renderer, w.scale_factor()));

    commands.spawn((
        Camera3d::default(),
        Camera {
            // Drawn on top of the main render, into its own sub-rect
            order: 1,
            clear_color: ClearColorConfig::None,
            viewport,
            ..default()
        },
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: 50.0,
                height: 50.0,
            },
            near: 0.1,
            far: 1000.0,
            ..OrthographicProjection::default_3d()
        }),
        Transform::from_xyz(0.0, 2000.0, 0.0).looking_at(Vec3::new(0.0, 1950.0, 0.0), Vec3::Z),
        RenderLayers::layer(MINIMAP_LAYER),
        MinimapCamera,
        renderer,
    ));
}

/// Keep the viewport pinned to the window corner across resizes.
pub fn update_minimap_viewport(
    mut resized: MessageReader<WindowResized>,
    window: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<(&mut Camera, &MinimapRenderer), With<MinimapCamera>>,
) -> Result {
    if resized.read().count() == 0 {
        return Ok(());
    }

    let window = window.single()?;
    for (mut camera, renderer) in cameras.iter_mut() {
        camera.viewport = Some(corner_viewport(
            window.physical_width(),
            window.physical_height(),
            renderer,
            window.scale_factor(),
        ));
    }
    Ok(())
}

/// Bottom-right corner rect in physical pixels, clamped so it stays inside
/// small windows.
fn corner_viewport(
    window_width: u32,
    window_height: u32,
    renderer: &MinimapRenderer,
    scale_factor: f32,
) -> Viewport {
    let size = ((renderer.size as f32 * scale_factor) as u32)
        .min(window_width)
        .min(window_height)
        .max(1);
    let padding = (renderer.padding as f32 * scale_factor) as u32;

    let x = window_width.saturating_sub(size + padding);
    let y = window_height.saturating_sub(size + padding);

    Viewport {
        physical_position: UVec2::new(x, y),
        physical_size: UVec2::new(size, size),
        ..default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_sits_in_the_corner() {
        let renderer = MinimapRenderer {
            size: 256,
            padding: 10,
        };
        let viewport = corner_viewport(1500, 900, &renderer, 1.0);
        assert_eq!(viewport.physical_position, UVec2::new(1500 - 266, 900 - 266));
        assert_eq!(viewport.physical_size, UVec2::new(256, 256));
    }

    #[test]
    fn viewport_scales_with_dpi() {
        let renderer = MinimapRenderer {
            size: 100,
            padding: 10,
        };
        let viewport = corner_viewport(2000, 1200, &renderer, 2.0);
        assert_eq!(viewport.physical_size, UVec2::new(200, 200));
        assert_eq!(viewport.physical_position, UVec2::new(2000 - 220, 1200 - 220));
    }

    #[test]
    fn viewport_survives_tiny_windows() {
        let renderer = MinimapRenderer::default();
        let viewport = corner_viewport(100, 80, &renderer, 1.0);
        assert_eq!(viewport.physical_size, UVec2::new(80, 80));
        assert!(viewport.physical_position.x + viewport.physical_size.x <= 100);
        assert!(viewport.physical_position.y + viewport.physical_size.y <= 80);
    }
}
