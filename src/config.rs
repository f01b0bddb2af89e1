use bevy::math::Vec2;
use bevy::prelude::*;
use bevy_water::{WaterConfig, WaveDescriptor, WaveError, WaveSet};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use terragen::{Mulberry32, TerrainConfig};

pub const CONFIG_PATH: &str = "tidewater.toml";

/// Construction-time scene configuration, read once at startup. There is
/// no runtime reconfiguration surface.
#[derive(Debug, Clone, Default, PartialEq, Resource, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub terrain: TerrainConfig,
    pub water: WaterSection,
    pub fog: FogSection,
    pub grading: GradingSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterSection {
    pub domain_size: f32,
    pub resolution: u32,
    pub wind_speed: f32,
    pub wind_direction: [f32; 2],
    pub max_depth: f32,
    /// Texel count per side of the offscreen height-field target.
    pub solve_resolution: u32,
    /// Seed for phase scattering of waves that don't pin a phase;
    /// omit for a fresh scatter every run.
    pub phase_seed: Option<u32>,
    /// Explicit wave components; empty means the canonical wind-driven set.
    pub waves: Vec<WaveEntry>,
}

impl Default for WaterSection {
    fn default() -> Self {
        Self {
            domain_size: 2048.0,
            resolution: 1024,
            wind_speed: 20.0,
            wind_direction: [1.0, 0.0],
            max_depth: 10.0,
            solve_resolution: 256,
            phase_seed: None,
            waves: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveEntry {
    pub direction: [f32; 2],
    pub amplitude: f32,
    pub wavelength: f32,
    pub speed: f32,
    pub phase: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSection {
    pub color: [f32; 3],
    /// Scene-wide exponential-squared fog density.
    pub density: f32,
    /// Density used inside the water shader's own fog term.
    pub water_density: f32,
    /// Fog volume opacity.
    pub volume_opacity: f32,
}

impl Default for FogSection {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            density: 0.05,
            water_density: 0.0005,
            volume_opacity: 0.7,
        }
    }
}

impl FogSection {
    pub fn color(&self) -> Color {
        Color::srgb(self.color[0], self.color[1], self.color[2])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GradingSection {
    pub saturation: f32,
    pub contrast: f32,
    pub brightness: f32,
}

impl Default for GradingSection {
    fn default() -> Self {
        Self {
            saturation: 1.2,
            contrast: 1.1,
            brightness: 0.05,
        }
    }
}

impl SceneConfig {
    /// Load from `path`, falling back to defaults when the file doesn't
    /// exist. A present-but-malformed file is a fatal startup error.
    pub fn load_or_default(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content)
                .unwrap_or_else(|e| panic!("malformed {path}: {e}")),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("{path} not found, using built-in defaults");
                Self::default()
            }
            Err(e) => panic!("could not read {path}: {e}"),
        }
    }

    pub fn water_config(&self) -> WaterConfig {
        let wind = Vec2::from_array(self.water.wind_direction);
        let wind_direction = wind.try_normalize().unwrap_or_else(|| {
            warn!("wind direction {wind} has zero length, defaulting to +X");
            Vec2::X
        });

        WaterConfig {
            domain_size: self.water.domain_size,
            resolution: self.water.resolution,
            wind_speed: self.water.wind_speed,
            wind_direction,
            max_depth: self.water.max_depth,
        }
    }

    /// Build the ordered wave set: explicit entries when configured, the
    /// canonical wind-driven set otherwise. Entries without a pinned phase
    /// get one scattered from the phase seed.
    pub fn wave_set(&self) -> Result<WaveSet, WaveError> {
        let mut rng = Mulberry32::new(self.water.phase_seed.unwrap_or_else(rand::random));

        if self.water.waves.is_empty() {
            let set = WaveSet::default_for(&self.water_config());
            return Ok(set.with_scattered_phases(&mut rng));
        }

        let waves = self
            .water
            .waves
            .iter()
            .map(|entry| {
                let phase = entry
                    .phase
                    .unwrap_or_else(|| rng.random_range(0.0..TAU));
                WaveDescriptor::new(
                    Vec2::from_array(entry.direction),
                    entry.amplitude,
                    entry.wavelength,
                    entry.speed,
                    phase,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        WaveSet::new(waves)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: SceneConfig = toml::from_str("").unwrap();
        assert_eq!(config, SceneConfig::default());
    }

    #[test]
    fn partial_toml_overrides_one_section() {
        let config: SceneConfig = toml::from_str(
            "[water]\nwind_speed = 35.0\n\n[grading]\ncontrast = 1.5\n",
        )
        .unwrap();
        assert_eq!(config.water.wind_speed, 35.0);
        assert_eq!(config.grading.contrast, 1.5);
        assert_eq!(config.terrain, TerrainConfig::default());
        assert_eq!(config.fog, FogSection::default());
    }

    #[test]
    fn default_wave_set_is_canonical() {
        let config = SceneConfig {
            water: WaterSection {
                phase_seed: Some(1),
                ..Default::default()
            },
            ..Default::default()
        };
        let set = config.wave_set().unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn pinned_phase_seed_reproduces_phases() {
        let config = SceneConfig {
            water: WaterSection {
                phase_seed: Some(42),
                ..Default::default()
            },
            ..Default::default()
        };
        let a = config.wave_set().unwrap();
        let b = config.wave_set().unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    #[case([0.0, 0.0])]
    #[case([f32::NAN, 0.0])]
    fn degenerate_wind_is_defaulted(#[case] wind: [f32; 2]) {
        let config = SceneConfig {
            water: WaterSection {
                wind_direction: wind,
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(config.water_config().wind_direction, Vec2::X);
    }

    #[test]
    fn explicit_zero_direction_wave_is_rejected() {
        let config = SceneConfig {
            water: WaterSection {
                waves: vec![WaveEntry {
                    direction: [0.0, 0.0],
                    amplitude: 1.0,
                    wavelength: 10.0,
                    speed: 5.0,
                    phase: Some(0.0),
                }],
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(
            config.wave_set().unwrap_err(),
            WaveError::DegenerateDirection
        );
    }

    #[test]
    fn explicit_waves_keep_their_order() {
        let entries = vec![
            WaveEntry {
                direction: [1.0, 0.0],
                amplitude: 1.0,
                wavelength: 10.0,
                speed: 5.0,
                phase: Some(0.0),
            },
            WaveEntry {
                direction: [0.0, 1.0],
                amplitude: 0.5,
                wavelength: 20.0,
                speed: 2.0,
                phase: Some(0.0),
            },
        ];
        let config = SceneConfig {
            water: WaterSection {
                waves: entries,
                ..Default::default()
            },
            ..Default::default()
        };
        let set = config.wave_set().unwrap();
        let amplitudes: Vec<f32> = set.iter().map(|w| w.amplitude()).collect();
        assert_eq!(amplitudes, vec![1.0, 0.5]);
    }
}
