//! # Terragen
//!
//! Deterministic procedural terrain generation: a seeded 32-bit generator
//! feeding fractal simplex noise, sampled into a static height field.
//!
//! ```no_run
//! use terragen::{HeightGenerator, TerrainConfig, TerrainField};
//!
//! let config = TerrainConfig::default();
//! let generator = HeightGenerator::new(&config);
//! let field = TerrainField::generate(&generator, config.size, config.resolution);
//! let center = field.get(config.resolution / 2, config.resolution / 2);
//! ```

pub mod config;
pub mod heightfield;
pub mod rng;

pub use config::TerrainConfig;
pub use heightfield::{HeightGenerator, TerrainField};
pub use rng::Mulberry32;
