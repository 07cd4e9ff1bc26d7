pub mod config;
pub mod population;
pub mod settlements;
pub mod terrain;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::error::Result;
use crate::model::{BlockCatalog, CreatureCatalog, EMPTY, Grid, World};

pub use config::WorldGenConfig;
pub use terrain::BiomeBands;

/// Generate a complete world: terrain, then settlements, then creatures.
///
/// Every random draw comes from one generator seeded from `config.seed`, so
/// the same config and catalogs always produce the same world.
pub fn generate_world(
    config: &WorldGenConfig,
    blocks: &dyn BlockCatalog,
    creatures: &dyn CreatureCatalog,
) -> Result<World> {
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let bands = BiomeBands::resolve(&config.biomes, blocks)?;

    let noise = terrain::noise_field(config.extent, &config.noise, &mut rng);
    let terrain = terrain::assign_biomes(&noise, &bands);
    let occupancy = Grid::filled(config.extent, EMPTY);
    let mut world = World::from_grids(terrain, occupancy)?;

    let villages =
        settlements::generate_settlements(&mut world, &config.settlements, blocks, &mut rng)?;
    let creatures_placed = population::seed_population(&mut world, blocks, creatures, &mut rng)?;

    tracing::info!(
        seed = config.seed,
        extent = config.extent,
        villages,
        creatures = creatures_placed,
        "world generated"
    );
    Ok(world)
}
