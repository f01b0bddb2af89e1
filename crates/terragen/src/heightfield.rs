use crate::config::TerrainConfig;
use crate::rng::Mulberry32;
use noise::{NoiseFn, Simplex};

/// Fractal height sampler. The config seed feeds a [`Mulberry32`] stream
/// whose first draw seeds the simplex permutation, so one u32 reproduces
/// the whole terrain.
#[derive(Debug, Clone)]
pub struct HeightGenerator {
    simplex: Simplex,
    octaves: u32,
    persistence: f32,
    lacunarity: f32,
    feature_scale: f32,
    height_scale: f32,
}

impl HeightGenerator {
    pub fn new(config: &TerrainConfig) -> Self {
        let mut rng = Mulberry32::new(config.seed);
        Self {
            simplex: Simplex::new(rng.next()),
            octaves: config.octaves.max(1),
            persistence: config.persistence,
            lacunarity: config.lacunarity,
            feature_scale: config.feature_scale,
            height_scale: config.height_scale,
        }
    }

    /// Multi-octave noise at a world coordinate, normalized to [-1, 1] by
    /// the sum of octave amplitudes.
    pub fn fractal(&self, x: f32, z: f32) -> f32 {
        let mut sum = 0.0_f32;
        let mut amplitude = 1.0_f32;
        let mut frequency = 1.0_f32;
        let mut total_amplitude = 0.0_f32;

        for _ in 0..self.octaves {
            let nx = (x / self.feature_scale * frequency) as f64;
            let nz = (z / self.feature_scale * frequency) as f64;
            sum += self.simplex.get([nx, nz]) as f32 * amplitude;
            total_amplitude += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }

        sum / total_amplitude
    }

    /// Terrain height at a world coordinate.
    pub fn height(&self, x: f32, z: f32) -> f32 {
        self.fractal(x, z) * self.height_scale
    }
}

/// Static grid of height samples, baked once at startup. Row-major with x
/// varying fastest; vertex (i, j) sits at world
/// `((i / (res - 1) - 0.5) * size, (j / (res - 1) - 0.5) * size)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainField {
    size: f32,
    resolution: usize,
    heights: Vec<f32>,
}

impl TerrainField {
    pub fn generate(generator: &HeightGenerator, size: f32, resolution: usize) -> Self {
        assert!(resolution >= 2, "terrain grid needs at least 2x2 vertices");

        let step = 1.0 / (resolution - 1) as f32;
        let mut heights = Vec::with_capacity(resolution * resolution);
        for j in 0..resolution {
            let z = (j as f32 * step - 0.5) * size;
            for i in 0..resolution {
                let x = (i as f32 * step - 0.5) * size;
                heights.push(generator.height(x, z));
            }
        }

        Self {
            size,
            resolution,
            heights,
        }
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.heights[j * self.resolution + i]
    }

    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    /// World-space position of grid vertex (i, j), before the base-plane
    /// offset is applied.
    pub fn vertex(&self, i: usize, j: usize) -> glam::Vec3 {
        let step = 1.0 / (self.resolution - 1) as f32;
        glam::Vec3::new(
            (i as f32 * step - 0.5) * self.size,
            self.get(i, j),
            (j as f32 * step - 0.5) * self.size,
        )
    }

    pub fn min_max(&self) -> (f32, f32) {
        self.heights.iter().fold(
            (f32::INFINITY, f32::NEG_INFINITY),
            |(lo, hi), &h| (lo.min(h), hi.max(h)),
        )
    }
}
