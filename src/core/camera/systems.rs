use crate::config::SceneConfig;
use crate::core::camera::components::MainCamera;
use crate::loading::{ReadyLatch, SceneAssets, TOKEN_SKYBOX};
use bevy::core_pipeline::Skybox;
use bevy::input::ButtonInput;
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::light::DirectionalLight;
use bevy::pbr::{DistanceFog, FogFalloff};
use bevy::prelude::*;
use bevy::render::render_resource::{TextureViewDescriptor, TextureViewDimension};
use bevy::render::view::{ColorGrading, ColorGradingGlobal, ColorGradingSection};

pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 3000.0;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75.0_f32.to_radians(),
            near: CAMERA_NEAR,
            far: CAMERA_FAR,
            ..default()
        }),
        Transform::from_xyz(50.0, 50.0, 50.0).looking_at(Vec3::ZERO, Vec3::Y),
        MainCamera,
    ));

    info!("Camera spawned");
}

pub fn spawn_lights(mut commands: Commands) {
    let light_color = Color::srgb_u8(0xF2, 0xF2, 0xE1);

    commands.insert_resource(AmbientLight {
        color: light_color,
        brightness: 150.0,
        ..default()
    });

    commands.spawn((
        Transform::from_xyz(-100.0, 100.0, -100.0).looking_at(Vec3::ZERO, Vec3::Y),
        DirectionalLight {
            color: light_color,
            ..default()
        },
    ));
}

/// Attach fog, color correction and the skybox once the cubemap asset is
/// available. The stacked strip is reinterpreted into a cube view here;
/// the water material reflects from the same handle.
pub fn attach_scene_effects(
    mut commands: Commands,
    config: Res<SceneConfig>,
    assets: Res<SceneAssets>,
    mut images: ResMut<Assets<Image>>,
    mut latch: ResMut<ReadyLatch>,
    camera: Query<Entity, With<MainCamera>>,
) {
    let image = images
        .get_mut(&assets.skybox)
        .expect("skybox image must exist once loading has finished");
    if image.texture_descriptor.array_layer_count() == 1 {
        image.reinterpret_stacked_2d_as_array(6);
        image.texture_view_descriptor = Some(TextureViewDescriptor {
            dimension: Some(TextureViewDimension::Cube),
            ..default()
        });
    }

    let fog_color = config.fog.color();
    let section = ColorGradingSection {
        contrast: config.grading.contrast,
        ..default()
    };

    let camera = camera.single().expect("main camera exists");
    commands.entity(camera).insert((
        DistanceFog {
            color: fog_color,
            falloff: FogFalloff::ExponentialSquared {
                density: config.fog.density,
            },
            ..default()
        },
        ColorGrading {
            global: ColorGradingGlobal {
                exposure: config.grading.brightness,
                post_saturation: config.grading.saturation,
                ..default()
            },
            shadows: section,
            midtones: section,
            highlights: section,
        },
        Skybox {
            image: assets.skybox.clone(),
            brightness: 1000.0,
            rotation: Quat::IDENTITY,
        },
    ));

    latch.complete(TOKEN_SKYBOX);
}

pub fn camera_control(
    keyboard_input: Res<ButtonInput<KeyCode>>,
    mouse_input: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    time: Res<Time>,
    mut camera_q: Query<&mut Transform, With<MainCamera>>,
) -> Result {
    let dt = time.delta().as_secs_f32();
    let mut transform = camera_q.single_mut()?;

    let mut speed = 25.0;
    if keyboard_input.any_pressed([KeyCode::ShiftLeft, KeyCode::ShiftRight]) {
        speed *= 5.0;
    }

    let forward = transform.rotation.mul_vec3(Vec3::new(0.0, 0.0, -1.0));
    let right = transform.rotation.mul_vec3(Vec3::new(1.0, 0.0, 0.0));
    let mut dir = Vec3::ZERO;

    if keyboard_input.pressed(KeyCode::KeyW) {
        dir += forward;
    }
    if keyboard_input.pressed(KeyCode::KeyS) {
        dir -= forward;
    }
    if keyboard_input.pressed(KeyCode::KeyA) {
        dir -= right;
    }
    if keyboard_input.pressed(KeyCode::KeyD) {
        dir += right;
    }
    if dir.length_squared() > 0.0 {
        transform.translation += dir.normalize() * speed * dt;
    }

    if mouse_input.pressed(MouseButton::Right) {
        for ev in mouse_motion.read() {
            let yaw = Quat::from_rotation_y(-ev.delta.x * 0.002);
            let pitch = Quat::from_rotation_x(-ev.delta.y * 0.002);
            transform.rotation = yaw * transform.rotation * pitch;
        }
    }

    for ev in mouse_wheel.read() {
        transform.translation += forward * ev.y * 2.0;
    }

    Ok(())
}
