use std::path::Path;

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Side length of the reference world.
pub const DEFAULT_EXTENT: usize = 3000;

/// Inclusive integer range drawn from uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn sample(self, rng: &mut dyn RngCore) -> u32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.random_range(self.min..=self.max)
    }
}

/// Configuration for world generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    /// RNG seed for deterministic generation.
    pub seed: u64,
    /// Side length of the square world.
    pub extent: usize,
    pub noise: NoiseConfig,
    pub biomes: BiomeConfig,
    pub settlements: SettlementConfig,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            extent: DEFAULT_EXTENT,
            noise: NoiseConfig::default(),
            biomes: BiomeConfig::default(),
            settlements: SettlementConfig::default(),
        }
    }
}

impl WorldGenConfig {
    /// Read a JSON config. Keys left out keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        Ok(serde_json::from_str(&std::fs::read_to_string(path)?)?)
    }
}

/// Fractal noise used for elevation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Number of octaves layered together.
    pub octaves: u32,
    /// Wavelength in cells of the coarsest octave.
    pub base_wavelength: f64,
    /// Amplitude multiplier from one octave to the next finer one.
    pub persistence: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 10,
            base_wavelength: 512.0,
            persistence: 0.5,
        }
    }
}

/// One elevation band: cells whose noise is below `below` get `block`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiomeBand {
    pub below: f64,
    pub block: String,
}

impl BiomeBand {
    pub fn new(below: f64, block: &str) -> Self {
        Self {
            below,
            block: block.to_string(),
        }
    }
}

/// Ordered elevation bands plus the block used above the last one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeConfig {
    pub bands: Vec<BiomeBand>,
    pub fallback: String,
}

impl Default for BiomeConfig {
    fn default() -> Self {
        Self {
            bands: vec![
                BiomeBand::new(0.50, "water"),
                BiomeBand::new(0.53, "sand"),
                BiomeBand::new(0.80, "grass"),
                BiomeBand::new(0.82, "tall grass"),
            ],
            fallback: "rock".to_string(),
        }
    }
}

/// Village layout parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementConfig {
    /// Villages per world.
    pub count: Span,
    /// Anchors are drawn from `[margin, extent - margin]` on both axes.
    pub anchor_margin: usize,
    /// Main path length in units of five cells.
    pub length_units: Span,
    pub path_width: Span,
    /// Distance from the anchor to the first side street.
    pub first_offset: Span,
    /// Distance between consecutive side streets.
    pub spacing: Span,
    pub spur_length: Span,
    /// Huts are `2 * half_size + 1` cells square.
    pub hut_half_size: Span,
    pub floor_block: String,
    pub wall_block: String,
    pub surveyor_block: String,
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            count: Span::new(300, 400),
            anchor_margin: 500,
            length_units: Span::new(4, 15),
            path_width: Span::new(3, 5),
            first_offset: Span::new(2, 5),
            spacing: Span::new(5, 10),
            spur_length: Span::new(3, 10),
            hut_half_size: Span::new(2, 4),
            floor_block: "village floor".to_string(),
            wall_block: "village wall".to_string(),
            surveyor_block: "surveyor".to_string(),
        }
    }
}
