use crate::config::SceneConfig;
use crate::loading::{ReadyLatch, TOKEN_HEIGHT_FIELD};
use crate::water::components::SolverCamera;
use bevy::asset::RenderAssetUsages;
use bevy::camera::visibility::RenderLayers;
use bevy::camera::{ClearColorConfig, RenderTarget, ScalingMode};
use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::image::{Image, ImageSampler};
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureUsages,
};
use bevy::render::renderer::RenderAdapter;
use bevy::render::view::Hdr;
use bevy_water::SolveMaterial;

/// Render layer reserved for the solve pass quad and camera.
pub const SOLVE_LAYER: usize = 1;

const TARGET_FORMAT: TextureFormat = TextureFormat::Rgba32Float;

/// Output of the offscreen solve. The solver is the only writer; the water
/// material and the minimap read the texture.
#[derive(Resource, Debug)]
pub struct HeightFieldSolve {
    pub texture: Handle<Image>,
    frames_rendered: u32,
    finished: bool,
}

/// Build the offscreen float target and the solve pass: a full-screen quad
/// with the solve material, framed by an orthographic camera that renders
/// before the main one.
///
/// Panics when the adapter cannot render into the float format - silently
/// degraded shading is worse than a loud startup failure.
pub fn setup_height_field_solver(
    mut commands: Commands,
    config: Res<SceneConfig>,
    render_adapter: Res<RenderAdapter>,
    mut images: ResMut<Assets<Image>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<SolveMaterial>>,
) {
    let format_features = render_adapter.get_texture_format_features(TARGET_FORMAT);
    assert!(
        format_features
            .allowed_usages
            .contains(TextureUsages::RENDER_ATTACHMENT),
        "GPU adapter cannot render to {TARGET_FORMAT:?}; the water height-field solve \
         requires float color targets"
    );

    let resolution = config.water.solve_resolution;
    let mut image = Image::new_fill(
        Extent3d {
            width: resolution,
            height: resolution,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        &[0; 16],
        TARGET_FORMAT,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image.sampler = ImageSampler::nearest();
    let texture = images.add(image);

    // Quad spanning [-1, 1]^2 in front of the camera.
    commands.spawn((
        Mesh3d(meshes.add(Rectangle::new(2.0, 2.0))),
        MeshMaterial3d(materials.add(SolveMaterial {
            resolution: resolution as f32,
        })),
        Transform::default(),
        RenderLayers::layer(SOLVE_LAYER),
    ));

    commands.spawn((
        Camera3d::default(),
        Camera {
            target: RenderTarget::Image(texture.clone().into()),
            // Solve before the main camera within the frame
            order: -10,
            clear_color: ClearColorConfig::Custom(Color::BLACK),
            ..default()
        },
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::Fixed {
                width: 2.0,
                height: 2.0,
            },
            near: 0.0,
            far: 2.0,
            ..OrthographicProjection::default_3d()
        }),
        Transform::from_xyz(0.0, 0.0, 1.0).looking_at(Vec3::ZERO, Vec3::Y),
        Msaa::Off,
        Tonemapping::None,
        Hdr,
        RenderLayers::layer(SOLVE_LAYER),
        SolverCamera,
    ));

    commands.insert_resource(HeightFieldSolve {
        texture,
        frames_rendered: 0,
        finished: false,
    });

    info!("Height-field solve target created: {resolution}x{resolution} {TARGET_FORMAT:?}");
}

/// The solve is a single pass: once one frame has been rendered the target
/// holds the field, so the solver camera is switched off and the latch
/// token completed.
pub fn finish_height_field_solve(
    mut solve: ResMut<HeightFieldSolve>,
    mut latch: ResMut<ReadyLatch>,
    mut cameras: Query<&mut Camera, With<SolverCamera>>,
) -> Result {
    if solve.finished {
        return Ok(());
    }

    if solve.frames_rendered == 0 {
        // The pass spawned this frame; it renders after this system runs.
        solve.frames_rendered = 1;
        return Ok(());
    }

    cameras.single_mut()?.is_active = false;
    solve.finished = true;
    latch.complete(TOKEN_HEIGHT_FIELD);
    info!("Height-field solve flushed");
    Ok(())
}
