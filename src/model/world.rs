use rand::{Rng, RngCore};

use super::actor::Position;
use super::block::{BlockCatalog, BlockId};
use super::creature::{CreatureCatalog, CreatureId, EMPTY};
use super::grid::Grid;
use crate::error::{Result, WorldError};

/// Random probes before `find_open_cell` falls back to a full scan.
const SPAWN_PROBES: usize = 1024;

/// The terrain and occupancy grids. Nothing else holds a copy of either.
#[derive(Debug, Clone, PartialEq)]
pub struct World {
    terrain: Grid<BlockId>,
    occupancy: Grid<CreatureId>,
}

impl World {
    /// An `extent`×`extent` world of one block type with no creatures.
    pub fn new(extent: usize, fill: BlockId) -> Self {
        Self {
            terrain: Grid::filled(extent, fill),
            occupancy: Grid::filled(extent, EMPTY),
        }
    }

    pub fn from_grids(terrain: Grid<BlockId>, occupancy: Grid<CreatureId>) -> Result<Self> {
        if terrain.extent() != occupancy.extent() {
            return Err(WorldError::MalformedSave(format!(
                "terrain is {0}x{0} but occupancy is {1}x{1}",
                terrain.extent(),
                occupancy.extent()
            )));
        }
        Ok(Self { terrain, occupancy })
    }

    pub fn extent(&self) -> usize {
        self.terrain.extent()
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        self.terrain.in_bounds(x, y)
    }

    pub fn terrain(&self) -> &Grid<BlockId> {
        &self.terrain
    }

    pub fn occupancy(&self) -> &Grid<CreatureId> {
        &self.occupancy
    }

    pub fn block_at(&self, x: i64, y: i64) -> Result<BlockId> {
        self.terrain.get(x, y)
    }

    pub fn set_block(&mut self, x: i64, y: i64, block: BlockId) -> Result<()> {
        self.terrain.set(x, y, block)
    }

    pub fn occupant_at(&self, x: i64, y: i64) -> Result<CreatureId> {
        self.occupancy.get(x, y)
    }

    pub fn set_occupant(&mut self, x: i64, y: i64, creature: CreatureId) -> Result<()> {
        self.occupancy.set(x, y, creature)
    }

    pub fn clear_occupant(&mut self, x: i64, y: i64) -> Result<()> {
        self.occupancy.set(x, y, EMPTY)
    }

    pub fn occupant(&self, pos: Position) -> Result<CreatureId> {
        self.occupant_at(pos.x as i64, pos.y as i64)
    }

    /// Check every cell against the catalogs.
    pub fn validate(&self, blocks: &dyn BlockCatalog, creatures: &dyn CreatureCatalog) -> Result<()> {
        for &block in self.terrain.cells() {
            blocks.block(block)?;
        }
        for &creature in self.occupancy.cells() {
            if creature != EMPTY {
                creatures.template(creature)?;
            }
        }
        Ok(())
    }

    fn is_open(&self, blocks: &dyn BlockCatalog, x: i64, y: i64) -> Result<bool> {
        Ok(!blocks.is_solid(self.block_at(x, y)?)? && self.occupant_at(x, y)? == EMPTY)
    }

    /// A random non-solid, unoccupied cell to place a new actor on.
    pub fn find_open_cell(
        &self,
        blocks: &dyn BlockCatalog,
        rng: &mut dyn RngCore,
    ) -> Result<Option<Position>> {
        let extent = self.extent();
        if extent == 0 {
            return Ok(None);
        }
        for _ in 0..SPAWN_PROBES {
            let x = rng.random_range(0..extent);
            let y = rng.random_range(0..extent);
            if self.is_open(blocks, x as i64, y as i64)? {
                return Ok(Some(Position::new(x, y)));
            }
        }
        for y in 0..extent {
            for x in 0..extent {
                if self.is_open(blocks, x as i64, y as i64)? {
                    return Ok(Some(Position::new(x, y)));
                }
            }
        }
        Ok(None)
    }
}
