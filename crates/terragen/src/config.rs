use serde::{Deserialize, Serialize};

/// Construction-time terrain parameters. Loaded once from TOML at startup;
/// never reconfigured at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Seed for the Mulberry32 stream that drives the noise primitive.
    pub seed: u32,
    /// Number of fractal octaves summed per sample.
    pub octaves: u32,
    /// Amplitude falloff per octave.
    pub persistence: f32,
    /// Frequency growth per octave.
    pub lacunarity: f32,
    /// World units per noise unit; larger values give broader features.
    pub feature_scale: f32,
    /// Vertical scale applied to the normalized noise value.
    pub height_scale: f32,
    /// Physical width/depth of the terrain patch.
    pub size: f32,
    /// Vertices per side of the terrain grid.
    pub resolution: usize,
    /// World-space height of the terrain base plane.
    pub base_height: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
            feature_scale: 20.0,
            height_scale: 2.0,
            size: 2048.0,
            resolution: 512,
            base_height: -4.0,
        }
    }
}

impl TerrainConfig {
    pub fn load_from_file(path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        let config: TerrainConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toml_round_trip() {
        let config = TerrainConfig {
            seed: 99,
            octaves: 6,
            ..Default::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        let back: TerrainConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: TerrainConfig = toml::from_str("seed = 7\noctaves = 2\n").unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.octaves, 2);
        assert_eq!(config.persistence, TerrainConfig::default().persistence);
        assert_eq!(config.resolution, TerrainConfig::default().resolution);
    }
}
