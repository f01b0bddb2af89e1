use crate::WaterConfig;
use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, Mesh, PrimitiveTopology};

/// Builder for the water surface grid: a flat XZ plane centered on the
/// origin, `resolution` vertices per side, UVs spanning [0, 1] so the
/// height-field and terrain textures align with the domain.
pub struct WaterMeshBuilder {
    domain_size: f32,
    resolution: u32,
}

impl WaterMeshBuilder {
    pub fn new(config: &WaterConfig) -> Self {
        assert!(config.resolution >= 2, "water grid needs at least 2x2 vertices");
        Self {
            domain_size: config.domain_size,
            resolution: config.resolution,
        }
    }

    pub fn build(&self) -> Mesh {
        let n = self.resolution;
        let step = 1.0 / (n - 1) as f32;

        let mut positions = Vec::with_capacity((n * n) as usize);
        let mut normals = Vec::with_capacity((n * n) as usize);
        let mut uvs = Vec::with_capacity((n * n) as usize);
        let mut indices = Vec::with_capacity(((n - 1) * (n - 1) * 6) as usize);

        for j in 0..n {
            let v = j as f32 * step;
            let z = (v - 0.5) * self.domain_size;
            for i in 0..n {
                let u = i as f32 * step;
                let x = (u - 0.5) * self.domain_size;
                positions.push([x, 0.0, z]);
                normals.push([0.0, 1.0, 0.0]);
                uvs.push([u, v]);
            }
        }

        for j in 0..n - 1 {
            for i in 0..n - 1 {
                let i0 = j * n + i;
                let i1 = i0 + 1;
                let i2 = i0 + n;
                let i3 = i2 + 1;

                // Two triangles per quad, counter-clockwise seen from +Y
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
        mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
        mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
        mesh.insert_indices(Indices::U32(indices));

        mesh
    }
}
