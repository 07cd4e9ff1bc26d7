use rand::{Rng, RngCore};

use crate::error::Result;
use crate::model::{BlockCatalog, CreatureCatalog, World};

/// Scatter creatures over every non-solid cell whose block has a
/// `mob-spawn-chance`. Returns how many were placed.
///
/// Cells already occupied are overwritten, so this runs once, after terrain
/// and settlements.
pub fn seed_population(
    world: &mut World,
    blocks: &dyn BlockCatalog,
    creatures: &dyn CreatureCatalog,
    rng: &mut dyn RngCore,
) -> Result<usize> {
    let types = creatures.count();
    if types == 0 {
        return Ok(0);
    }

    let extent = world.extent() as i64;
    let mut placed = 0;
    for y in 0..extent {
        for x in 0..extent {
            let block = blocks.block(world.block_at(x, y)?)?;
            if block.solid {
                continue;
            }
            let Some(chance) = block.mob_spawn_chance else {
                continue;
            };
            if rng.random_range(0..100) < chance {
                world.set_occupant(x, y, rng.random_range(1..=types))?;
                placed += 1;
            }
        }
    }
    Ok(placed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EMPTY;
    use crate::testutil;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn creatures_only_on_spawning_ground() {
        let blocks = testutil::blocks();
        let creatures = testutil::creatures();
        let mut world = World::new(40, testutil::GRASS);
        for x in 0..40 {
            world.set_block(x, 0, testutil::WATER).unwrap();
            world.set_block(x, 1, testutil::SAND).unwrap();
        }

        let mut rng = SmallRng::seed_from_u64(9);
        let placed = seed_population(&mut world, &blocks, &creatures, &mut rng).unwrap();
        assert!(placed > 0, "5% of ~1500 grass cells should spawn something");

        let mut counted = 0;
        for y in 0..40 {
            for x in 0..40 {
                let occupant = world.occupant_at(x, y).unwrap();
                if occupant == EMPTY {
                    continue;
                }
                counted += 1;
                assert!(y >= 2, "creature placed on water or sand at ({x}, {y})");
                assert!((1..=creatures.count()).contains(&occupant));
            }
        }
        assert_eq!(counted, placed);
    }

    #[test]
    fn spawn_rate_tracks_chance() {
        let blocks = testutil::blocks();
        let creatures = testutil::creatures();
        let mut world = World::new(100, testutil::GRASS);
        let mut rng = SmallRng::seed_from_u64(10);
        let placed = seed_population(&mut world, &blocks, &creatures, &mut rng).unwrap();
        // 10_000 cells at 5%.
        assert!((350..650).contains(&placed), "placed {placed}");
    }

    #[test]
    fn every_type_appears() {
        let blocks = testutil::blocks();
        let creatures = testutil::creatures();
        let mut world = World::new(100, testutil::TALL_GRASS);
        let mut rng = SmallRng::seed_from_u64(11);
        seed_population(&mut world, &blocks, &creatures, &mut rng).unwrap();
        for id in 1..=creatures.count() {
            assert!(world.occupancy().cells().contains(&id), "type {id} never spawned");
        }
    }

    #[test]
    fn unknown_block_is_an_error() {
        let blocks = testutil::blocks();
        let creatures = testutil::creatures();
        let mut world = World::new(4, testutil::GRASS);
        world.set_block(2, 2, 99).unwrap();
        let mut rng = SmallRng::seed_from_u64(12);
        assert!(seed_population(&mut world, &blocks, &creatures, &mut rng).is_err());
    }
}
