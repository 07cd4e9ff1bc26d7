use rand::{Rng, RngCore};

use super::config::SettlementConfig;
use crate::error::{Result, WorldError};
use crate::model::{BlockCatalog, BlockId, World};

/// Block ids a village is built from, resolved once per world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VillageBlocks {
    pub floor: BlockId,
    pub wall: BlockId,
    pub surveyor: BlockId,
    /// Percent chance that a hut interior cell becomes a surveyor block.
    pub surveyor_chance: u32,
}

impl VillageBlocks {
    pub fn resolve(config: &SettlementConfig, blocks: &dyn BlockCatalog) -> Result<Self> {
        let surveyor = blocks.block_named(&config.surveyor_block)?;
        Ok(Self {
            floor: blocks.block_named(&config.floor_block)?.id,
            wall: blocks.block_named(&config.wall_block)?.id,
            surveyor: surveyor.id,
            surveyor_chance: surveyor.extras.int_or("spawn-chance", 0)?.clamp(0, 100) as u32,
        })
    }
}

/// Where a hut was stamped. `x`, `y` is the top-left wall corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hut {
    pub x: i64,
    pub y: i64,
    pub size: i64,
    pub above_path: bool,
}

/// Layout of one stamped village. Only used to report what was built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Village {
    pub anchor: (i64, i64),
    pub length: i64,
    pub width: i64,
    pub huts: Vec<Hut>,
}

/// Scatter villages over the interior of the world.
///
/// Anchors whose structures would leave the grid are discarded after logging;
/// whatever was stamped before the failing cell stays. Returns the number of
/// villages built.
pub fn generate_settlements(
    world: &mut World,
    config: &SettlementConfig,
    blocks: &dyn BlockCatalog,
    rng: &mut dyn RngCore,
) -> Result<usize> {
    let village_blocks = VillageBlocks::resolve(config, blocks)?;
    let extent = world.extent();
    let margin = config.anchor_margin;
    if extent <= margin * 2 {
        tracing::warn!(extent, margin, "world too small for settlements");
        return Ok(0);
    }

    let count = config.count.sample(rng);
    let mut built = 0;
    for _ in 0..count {
        let x = rng.random_range(margin..=extent - margin) as i64;
        let y = rng.random_range(margin..=extent - margin) as i64;
        match place_village(world, (x, y), config, &village_blocks, rng) {
            Ok(village) => {
                tracing::debug!(x, y, huts = village.huts.len(), "village placed");
                built += 1;
            }
            Err(err @ WorldError::OutOfBounds { .. }) => {
                tracing::warn!(x, y, %err, "discarding village anchor");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(built)
}

/// Stamp a village whose main path starts at `anchor` and runs east.
///
/// Side streets branch off alternately below and above the path, each ending
/// at a hut door. No clamping: any cell outside the grid is an `OutOfBounds`
/// error.
pub fn place_village(
    world: &mut World,
    anchor: (i64, i64),
    config: &SettlementConfig,
    blocks: &VillageBlocks,
    rng: &mut dyn RngCore,
) -> Result<Village> {
    let (x0, y0) = anchor;
    let length = config.length_units.sample(rng) as i64 * 5;
    let width = config.path_width.sample(rng) as i64;

    for x in x0..x0 + length {
        for y in y0..y0 + width {
            stamp_floor(world, x, y, blocks.floor)?;
        }
    }

    let mut huts = Vec::new();
    let mut above = false;
    let mut x = x0 + config.first_offset.sample(rng) as i64;
    while x < x0 + length {
        let spur = config.spur_length.sample(rng) as i64;
        let half = config.hut_half_size.sample(rng) as i64;
        let size = half * 2 + 1;

        let hut_y = if above {
            for y in (y0 - spur + 1)..=y0 {
                stamp_floor(world, x, y, blocks.floor)?;
            }
            // Bottom wall sits on the last spur cell; its door keeps it open.
            y0 - spur - size + 2
        } else {
            for y in (y0 + width)..(y0 + width + spur) {
                stamp_floor(world, x, y, blocks.floor)?;
            }
            y0 + width + spur
        };
        huts.push(stamp_hut(world, (x - half, hut_y), half, above, blocks, rng)?);

        above = !above;
        x += config.spacing.sample(rng) as i64;
    }

    Ok(Village {
        anchor,
        length,
        width,
        huts,
    })
}

/// Stamp a square hut of side `2 * half + 1` with its top-left corner at `origin`.
///
/// The ring is wall except for one door cell at the middle of each edge. The
/// interior is floor, each cell with a chance of becoming a surveyor block.
/// Every hut cell is cleared of creatures.
pub fn stamp_hut(
    world: &mut World,
    origin: (i64, i64),
    half: i64,
    above_path: bool,
    blocks: &VillageBlocks,
    rng: &mut dyn RngCore,
) -> Result<Hut> {
    let (x0, y0) = origin;
    let size = half * 2 + 1;
    let last = size - 1;

    for dy in 0..size {
        for dx in 0..size {
            let (x, y) = (x0 + dx, y0 + dy);
            let on_ring = dx == 0 || dy == 0 || dx == last || dy == last;
            let is_door = dx == half || dy == half;
            let block = if on_ring {
                if is_door { blocks.floor } else { blocks.wall }
            } else if rng.random_range(0..100) < blocks.surveyor_chance {
                blocks.surveyor
            } else {
                blocks.floor
            };
            world.set_block(x, y, block)?;
            world.clear_occupant(x, y)?;
        }
    }

    Ok(Hut {
        x: x0,
        y: y0,
        size,
        above_path,
    })
}

fn stamp_floor(world: &mut World, x: i64, y: i64, floor: BlockId) -> Result<()> {
    world.set_block(x, y, floor)?;
    world.clear_occupant(x, y)
}
