use crate::config::SceneConfig;
use crate::loading::{ReadyLatch, TOKEN_TERRAIN};
use bevy::asset::RenderAssetUsages;
use bevy::image::{Image, ImageSampler};
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use terragen::{HeightGenerator, TerrainField};

/// Marker for the terrain mesh entity.
#[derive(Component)]
pub struct Terrain;

/// Handle to the baked terrain-height texture, sampled by the water shader
/// for depth/foam blending.
#[derive(Resource, Debug, Clone)]
pub struct TerrainHeightMap(pub Handle<Image>);

pub fn spawn_terrain(
    mut commands: Commands,
    config: Res<SceneConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut images: ResMut<Assets<Image>>,
    mut latch: ResMut<ReadyLatch>,
) {
    let generator = HeightGenerator::new(&config.terrain);
    let field = TerrainField::generate(&generator, config.terrain.size, config.terrain.resolution);

    let mesh_handle = meshes.add(build_terrain_mesh(&field));
    let material_handle = materials.add(StandardMaterial {
        base_color: Color::srgb_u8(0xE6, 0xE4, 0x65),
        perceptual_roughness: 0.95,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands.spawn((
        Mesh3d(mesh_handle),
        MeshMaterial3d(material_handle),
        Transform::from_xyz(0.0, config.terrain.base_height, 0.0),
        Terrain,
    ));

    let heightmap = images.add(bake_height_image(&field));
    commands.insert_resource(TerrainHeightMap(heightmap));

    let (lo, hi) = field.min_max();
    info!(
        "Terrain spawned: {0}x{0} vertices, heights {lo:.2}..{hi:.2}",
        field.resolution()
    );

    latch.complete(TOKEN_TERRAIN);
}

/// Static terrain mesh: the baked height grid with recomputed smooth
/// normals. Heights never change after this.
fn build_terrain_mesh(field: &TerrainField) -> Mesh {
    let n = field.resolution();

    let mut positions = Vec::with_capacity(n * n);
    let mut uvs = Vec::with_capacity(n * n);
    let mut indices = Vec::with_capacity((n - 1) * (n - 1) * 6);

    let inv = 1.0 / (n - 1) as f32;
    for j in 0..n {
        for i in 0..n {
            let v = field.vertex(i, j);
            positions.push([v.x, v.y, v.z]);
            uvs.push([i as f32 * inv, j as f32 * inv]);
        }
    }

    for j in 0..n - 1 {
        for i in 0..n - 1 {
            let i0 = (j * n + i) as u32;
            let i1 = i0 + 1;
            let i2 = i0 + n as u32;
            let i3 = i2 + 1;

            indices.push(i0);
            indices.push(i2);
            indices.push(i1);

            indices.push(i1);
            indices.push(i2);
            indices.push(i3);
        }
    }

    let mut mesh = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh.compute_smooth_normals();
    mesh
}

/// Bake the height grid into an R32Float texture. UVs line up with the
/// water grid since both span the same centered domain.
fn bake_height_image(field: &TerrainField) -> Image {
    let resolution = field.resolution() as u32;
    let data: Vec<u8> = field
        .heights()
        .iter()
        .flat_map(|h| h.to_le_bytes())
        .collect();

    let mut image = Image::new(
        Extent3d {
            width: resolution,
            height: resolution,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::R32Float,
        RenderAssetUsages::default(),
    );
    image.sampler = ImageSampler::nearest();
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use terragen::TerrainConfig;

    fn small_field() -> TerrainField {
        let config = TerrainConfig {
            size: 64.0,
            resolution: 8,
            ..Default::default()
        };
        TerrainField::generate(&HeightGenerator::new(&config), config.size, config.resolution)
    }

    #[test]
    fn terrain_mesh_counts() {
        let mesh = build_terrain_mesh(&small_field());
        assert_eq!(mesh.count_vertices(), 64);
        match mesh.indices().unwrap() {
            Indices::U32(indices) => assert_eq!(indices.len(), 7 * 7 * 6),
            Indices::U16(_) => panic!("expected u32 indices"),
        }
        assert!(mesh.attribute(Mesh::ATTRIBUTE_NORMAL).is_some());
    }

    #[test]
    fn height_image_layout() {
        let field = small_field();
        let image = bake_height_image(&field);
        assert_eq!(image.texture_descriptor.format, TextureFormat::R32Float);
        let data = image.data.as_ref().unwrap();
        assert_eq!(data.len(), 8 * 8 * 4);
        assert_eq!(&data[0..4], &field.heights()[0].to_le_bytes());
    }
}
