use noise::{NoiseFn, Perlin};
use rand::{Rng, RngCore};

use super::config::{BiomeConfig, NoiseConfig};
use crate::error::Result;
use crate::model::{BlockCatalog, BlockId, Grid};

/// Largest value the normalized field may hold; keeps it inside `[0, 1)`.
const MAX_ELEVATION: f32 = 1.0 - f32::EPSILON;

/// Biome bands with block names resolved against the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct BiomeBands {
    bands: Vec<(f64, BlockId)>,
    fallback: BlockId,
}

impl BiomeBands {
    pub fn resolve(config: &BiomeConfig, blocks: &dyn BlockCatalog) -> Result<Self> {
        let bands = config
            .bands
            .iter()
            .map(|band| Ok((band.below, blocks.block_named(&band.block)?.id)))
            .collect::<Result<Vec<_>>>()?;
        let fallback = blocks.block_named(&config.fallback)?.id;
        Ok(Self { bands, fallback })
    }

    /// First band whose threshold exceeds `value`, else the fallback.
    pub fn classify(&self, value: f64) -> BlockId {
        self.bands
            .iter()
            .find(|(below, _)| value < *below)
            .map(|&(_, block)| block)
            .unwrap_or(self.fallback)
    }
}

/// Layered Perlin noise over an `extent`×`extent` grid, normalized to `[0, 1)`.
///
/// Each octave gets its own Perlin seed drawn from `rng`, so the whole field is
/// reproducible from the world seed.
pub fn noise_field(extent: usize, config: &NoiseConfig, rng: &mut dyn RngCore) -> Grid<f32> {
    let octaves: Vec<(Perlin, f64, f64)> = (0..config.octaves.max(1))
        .map(|i| {
            let frequency = 2f64.powi(i as i32) / config.base_wavelength.max(1.0);
            let amplitude = config.persistence.powi(i as i32);
            (Perlin::new(rng.random()), frequency, amplitude)
        })
        .collect();
    let total_amplitude: f64 = octaves.iter().map(|(_, _, a)| a).sum();

    let mut field = Grid::filled(extent, 0.0f32);
    for (i, cell) in field.cells_mut().iter_mut().enumerate() {
        // Sample cell centers; Perlin is zero on integer lattice points.
        let px = (i % extent) as f64 + 0.5;
        let py = (i / extent) as f64 + 0.5;
        let sum: f64 = octaves
            .iter()
            .map(|(perlin, frequency, amplitude)| perlin.get([px * frequency, py * frequency]) * amplitude)
            .sum();
        let normalized = (sum / total_amplitude + 1.0) / 2.0;
        *cell = (normalized as f32).clamp(0.0, MAX_ELEVATION);
    }
    field
}

/// Assign a block to every cell of the noise field.
pub fn assign_biomes(noise: &Grid<f32>, bands: &BiomeBands) -> Grid<BlockId> {
    let mut terrain = Grid::filled(noise.extent(), bands.fallback);
    for (block, &value) in terrain.cells_mut().iter_mut().zip(noise.cells()) {
        *block = bands.classify(value as f64);
    }
    terrain
}
