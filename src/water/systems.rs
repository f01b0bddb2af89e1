use crate::config::SceneConfig;
use crate::core::camera::components::MainCamera;
use crate::core::camera::systems::{CAMERA_FAR, CAMERA_NEAR};
use crate::loading::{ReadyLatch, SceneAssets, TOKEN_WATER};
use crate::terrain::systems::{Terrain, TerrainHeightMap};
use crate::water::components::{FogVolume, WaterSurface};
use crate::water::solver::HeightFieldSolve;
use bevy::pbr::wireframe::Wireframe;
use bevy::prelude::*;
use bevy::render::render_resource::Face;
use bevy_water::{WaterMaterial, WaterMeshBuilder, WaterParams, WaterSurfaceState};

pub fn spawn_water(
    mut commands: Commands,
    config: Res<SceneConfig>,
    solve: Res<HeightFieldSolve>,
    terrain_heights: Res<TerrainHeightMap>,
    assets: Res<SceneAssets>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<WaterMaterial>>,
    mut latch: ResMut<ReadyLatch>,
) {
    let water_config = config.water_config();
    let waves = config
        .wave_set()
        .expect("configured wave set must be valid");

    let mut params = WaterParams {
        light_dir: Vec3::new(-100.0, 100.0, -100.0).normalize(),
        fog_color: config.fog.color().to_linear().to_vec4(),
        fog_density: config.fog.water_density,
        max_depth: water_config.max_depth,
        domain_size: water_config.domain_size,
        resolution: water_config.resolution as f32,
        camera_near: CAMERA_NEAR,
        camera_far: CAMERA_FAR,
        terrain_base: config.terrain.base_height,
        ..default()
    };
    params.write_waves(&waves);

    let mesh = WaterMeshBuilder::new(&water_config).build();
    commands.spawn((
        Mesh3d(meshes.add(mesh)),
        MeshMaterial3d(materials.add(WaterMaterial {
            params,
            height_field: solve.texture.clone(),
            terrain_heights: terrain_heights.0.clone(),
            environment_map: assets.skybox.clone(),
        })),
        Transform::default(),
        WaterSurface,
    ));

    commands.insert_resource(WaterSurfaceState::new(
        waves,
        &water_config,
        solve.texture.clone(),
    ));

    info!(
        "Water spawned: {0}x{0} vertices over {1}x{1}",
        water_config.resolution, water_config.domain_size
    );

    latch.complete(TOKEN_WATER);
}

pub fn spawn_fog_volume(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    commands.spawn((
        Mesh3d(meshes.add(Cuboid::new(2500.0, 2500.0, 2500.0))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: config.fog.color().with_alpha(config.fog.volume_opacity),
            alpha_mode: AlphaMode::Blend,
            // Show the inside of the box
            cull_mode: Some(Face::Front),
            ..default()
        })),
        Transform::default(),
        FogVolume,
    ));
}

/// The frame driver's per-frame water update: advance simulation time by
/// the frame delta and push time plus the wave arrays back into the
/// material. The uniform slots are rewritten in place; nothing reallocates.
pub fn advance_water(
    time: Res<Time>,
    mut state: ResMut<WaterSurfaceState>,
    mut materials: ResMut<Assets<WaterMaterial>>,
) {
    state.advance(time.delta().as_secs_f32());
    for (_, material) in materials.iter_mut() {
        material.params.time = state.time();
        material.params.write_waves(state.waves());
    }
}

/// Keep the fog volume glued to the camera pose.
pub fn track_fog_volume(
    camera: Query<&Transform, (With<MainCamera>, Without<FogVolume>)>,
    mut volumes: Query<&mut Transform, With<FogVolume>>,
) -> Result {
    let camera = camera.single()?;
    for mut transform in volumes.iter_mut() {
        transform.translation = camera.translation;
        transform.rotation = camera.rotation;
    }
    Ok(())
}

/// E toggles water wireframe, R terrain wireframe.
pub fn toggle_wireframe(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mut commands: Commands,
    water: Query<(Entity, Has<Wireframe>), With<WaterSurface>>,
    terrain: Query<(Entity, Has<Wireframe>), With<Terrain>>,
) {
    if keyboard_input.just_pressed(KeyCode::KeyE) {
        for (entity, wireframe) in water.iter() {
            if wireframe {
                commands.entity(entity).remove::<Wireframe>();
            } else {
                commands.entity(entity).insert(Wireframe);
            }
        }
    }
    if keyboard_input.just_pressed(KeyCode::KeyR) {
        for (entity, wireframe) in terrain.iter() {
            if wireframe {
                commands.entity(entity).remove::<Wireframe>();
            } else {
                commands.entity(entity).insert(Wireframe);
            }
        }
    }
}
