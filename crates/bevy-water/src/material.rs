use crate::waves::{MAX_WAVES, WaveSet};
use bevy::asset::{Asset, Handle};
use bevy::image::Image;
use bevy::math::{Vec2, Vec3, Vec4};
use bevy::mesh::MeshVertexBufferLayoutRef;
use bevy::pbr::{Material, MaterialPipeline, MaterialPipelineKey};
use bevy::prelude::AlphaMode;
use bevy::reflect::TypePath;
use bevy::render::render_resource::{
    AsBindGroup, RenderPipelineDescriptor, ShaderType, SpecializedMeshPipelineError,
};
use bevy::shader::ShaderRef;

/// One wave slot as laid out in the shader uniform array.
#[derive(Clone, Copy, Debug, Default, PartialEq, ShaderType)]
pub struct GpuWave {
    pub direction: Vec2,
    pub amplitude: f32,
    pub frequency: f32,
    pub phase_speed: f32,
    pub phase: f32,
    pub _padding: Vec2,
}

/// Uniform block for the water shader. Wave slots are written in wave-set
/// order; slots past `wave_count` are zeroed and ignored by the shader.
#[derive(Clone, Copy, Debug, ShaderType)]
pub struct WaterParams {
    pub light_dir: Vec3,
    pub time: f32,
    pub fog_color: Vec4,
    pub fog_density: f32,
    pub max_depth: f32,
    pub domain_size: f32,
    pub resolution: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub terrain_base: f32,
    pub wave_count: u32,
    pub waves: [GpuWave; MAX_WAVES],
}

impl Default for WaterParams {
    fn default() -> Self {
        Self {
            light_dir: Vec3::new(-1.0, 1.0, -1.0).normalize(),
            time: 0.0,
            fog_color: Vec4::ONE,
            fog_density: 0.0005,
            max_depth: 10.0,
            domain_size: 2048.0,
            resolution: 1024.0,
            camera_near: 0.1,
            camera_far: 3000.0,
            terrain_base: -4.0,
            wave_count: 0,
            waves: [GpuWave::default(); MAX_WAVES],
        }
    }
}

impl WaterParams {
    /// Copy the wave set into the uniform slots, preserving list order.
    /// Index correspondence is the contract: slot i always carries wave i.
    pub fn write_waves(&mut self, set: &WaveSet) {
        self.waves = [GpuWave::default(); MAX_WAVES];
        for (slot, wave) in self.waves.iter_mut().zip(set.iter()) {
            *slot = GpuWave {
                direction: wave.direction(),
                amplitude: wave.amplitude(),
                frequency: wave.frequency(),
                phase_speed: wave.phase_speed(),
                phase: wave.phase(),
                _padding: Vec2::ZERO,
            };
        }
        self.wave_count = set.len() as u32;
    }
}

/// Shading-stage water surface material. The vertex stage sums the wave
/// displacement with the solved height field; the fragment stage applies
/// directional lighting, depth/foam blending, cubemap reflection and
/// exponential-squared fog.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct WaterMaterial {
    #[uniform(0)]
    pub params: WaterParams,
    /// Solver-owned displacement texture; read-only here.
    #[texture(1, filterable = false)]
    #[sampler(2, sampler_type = "non_filtering")]
    pub height_field: Handle<Image>,
    /// Baked terrain heights, used for fake depth/foam blending.
    #[texture(3, filterable = false)]
    #[sampler(4, sampler_type = "non_filtering")]
    pub terrain_heights: Handle<Image>,
    #[texture(5, dimension = "cube")]
    #[sampler(6)]
    pub environment_map: Handle<Image>,
}

impl Default for WaterMaterial {
    fn default() -> Self {
        Self {
            params: WaterParams::default(),
            height_field: Handle::default(),
            terrain_heights: Handle::default(),
            environment_map: Handle::default(),
        }
    }
}

impl Material for WaterMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/water.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/water.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Blend
    }

    fn specialize(
        _pipeline: &MaterialPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // The surface is visible from below as well.
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}

/// Material for the one-shot height-field solve pass: a pure function of
/// UV and the resolution uniform, rendered once into an offscreen float
/// target.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct SolveMaterial {
    #[uniform(0)]
    pub resolution: f32,
}

impl Material for SolveMaterial {
    fn fragment_shader() -> ShaderRef {
        "shaders/height_field_solve.wgsl".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WaterConfig;
    use crate::waves::{WaveDescriptor, WaveSet};

    fn three_waves() -> WaveSet {
        WaveSet::new(vec![
            WaveDescriptor::new(Vec2::new(1.0, 0.0), 1.2, 20.0, 20.0, 0.0).unwrap(),
            WaveDescriptor::new(Vec2::new(-0.4, 1.0), 0.8, 30.0, 10.0, 0.5).unwrap(),
            WaveDescriptor::new(Vec2::new(0.2, -1.0), 0.5, 25.0, 13.0, 1.0).unwrap(),
        ])
        .unwrap()
    }

    #[test]
    fn slots_follow_list_order() {
        let set = three_waves();
        let mut params = WaterParams::default();
        params.write_waves(&set);

        assert_eq!(params.wave_count, 3);
        for (slot, wave) in params.waves.iter().zip(set.iter()) {
            assert_eq!(slot.direction, wave.direction());
            assert_eq!(slot.amplitude, wave.amplitude());
            assert_eq!(slot.frequency, wave.frequency());
            assert_eq!(slot.phase_speed, wave.phase_speed());
            assert_eq!(slot.phase, wave.phase());
        }
    }

    #[test]
    fn unused_slots_are_zeroed() {
        let mut params = WaterParams::default();
        params.write_waves(&three_waves());
        params.write_waves(&WaveSet::default_for(&WaterConfig::default()));

        assert_eq!(params.wave_count, 3);
        assert_eq!(params.waves[MAX_WAVES - 1], GpuWave::default());
    }

    #[test]
    fn rewriting_is_idempotent() {
        let set = three_waves();
        let mut a = WaterParams::default();
        a.write_waves(&set);
        let mut b = a;
        b.write_waves(&set);
        assert_eq!(a.waves, b.waves);
        assert_eq!(a.wave_count, b.wave_count);
    }
}
