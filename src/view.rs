//! Read-only pictures of the world for a renderer: a coarse area map and
//! square viewports around a point.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::model::{Actor, BlockCatalog, BlockId, CreatureId, EMPTY, Position, World, keys};
use crate::sim::Direction;

/// Side of one area-map chunk, in cells.
pub const CHUNK_SIZE: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapCell {
    /// The chunk holds one of the actors the map was drawn for.
    Actor,
    /// Heaviest block in the chunk.
    Block(BlockId),
}

/// Chunked summary of the whole world, row-major like the grids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AreaMap {
    pub chunk_size: usize,
    /// Chunks per row and per column.
    pub chunks: usize,
    cells: Vec<MapCell>,
}

impl AreaMap {
    pub fn get(&self, chunk_x: usize, chunk_y: usize) -> Option<MapCell> {
        if chunk_x >= self.chunks || chunk_y >= self.chunks {
            return None;
        }
        self.cells.get(chunk_x + chunk_y * self.chunks).copied()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[MapCell]> {
        self.cells.chunks(self.chunks.max(1))
    }
}

/// Block with the greatest total `map-weight` in a chunk. Ties go to the lower id.
fn majority_block(
    world: &World,
    blocks: &dyn BlockCatalog,
    x0: usize,
    y0: usize,
    chunk_size: usize,
) -> Result<BlockId> {
    let extent = world.extent();
    let mut weights: BTreeMap<BlockId, u64> = BTreeMap::new();
    for y in y0..(y0 + chunk_size).min(extent) {
        for x in x0..(x0 + chunk_size).min(extent) {
            let id = world.block_at(x as i64, y as i64)?;
            *weights.entry(id).or_insert(0) += u64::from(blocks.block(id)?.map_weight);
        }
    }
    let mut best: Option<(BlockId, u64)> = None;
    for (id, weight) in weights {
        if best.is_none_or(|(_, w)| weight > w) {
            best = Some((id, weight));
        }
    }
    Ok(best.map_or(0, |(id, _)| id))
}

/// Summarize the world in `chunk_size` squares. Chunks at the far edges may be
/// partial. Any chunk containing one of `actors` is drawn as [`MapCell::Actor`].
pub fn area_map(
    world: &World,
    blocks: &dyn BlockCatalog,
    chunk_size: usize,
    actors: &[Position],
) -> Result<AreaMap> {
    let chunk_size = chunk_size.max(1);
    let chunks = world.extent().div_ceil(chunk_size);
    let mut cells = Vec::with_capacity(chunks * chunks);
    for cy in 0..chunks {
        for cx in 0..chunks {
            let here = actors
                .iter()
                .any(|p| p.x / chunk_size == cx && p.y / chunk_size == cy);
            if here {
                cells.push(MapCell::Actor);
            } else {
                let block = majority_block(world, blocks, cx * chunk_size, cy * chunk_size, chunk_size)?;
                cells.push(MapCell::Block(block));
            }
        }
    }
    Ok(AreaMap {
        chunk_size,
        chunks,
        cells,
    })
}

/// A creature visible in a viewport, with the color it is drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sighting {
    pub creature: CreatureId,
    pub display: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewCell {
    pub position: Position,
    pub block: BlockId,
    /// `None` when the cell is empty or its block hides creatures.
    pub sighting: Option<Sighting>,
    /// The cell the view is centered on.
    pub is_center: bool,
}

/// Square window of cells around a center, clipped to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Viewport {
    pub center: (i64, i64),
    pub radius: usize,
    /// Cells per row after clipping.
    pub width: usize,
    cells: Vec<ViewCell>,
}

impl Viewport {
    pub fn cells(&self) -> &[ViewCell] {
        &self.cells
    }

    pub fn rows(&self) -> impl Iterator<Item = &[ViewCell]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn cell(&self, pos: Position) -> Option<&ViewCell> {
        self.cells.iter().find(|c| c.position == pos)
    }
}

/// Cells within `radius` of `center` on both axes. The center may lie outside
/// the grid; only in-grid cells are returned.
pub fn viewport(
    world: &World,
    blocks: &dyn BlockCatalog,
    center: (i64, i64),
    radius: usize,
) -> Result<Viewport> {
    let (cx, cy) = center;
    let r = radius as i64;
    let last = world.extent() as i64 - 1;
    let (x_lo, x_hi) = ((cx - r).max(0), (cx + r).min(last));
    let (y_lo, y_hi) = ((cy - r).max(0), (cy + r).min(last));

    let mut cells = Vec::new();
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let block = blocks.block(world.block_at(x, y)?)?;
            let occupant = world.occupant_at(x, y)?;
            let sighting = (occupant != EMPTY && !block.hide_mobs).then(|| Sighting {
                creature: occupant,
                display: block.mob_display.unwrap_or(0),
            });
            cells.push(ViewCell {
                position: Position::new(x as usize, y as usize),
                block: block.id,
                sighting,
                is_center: (x, y) == center,
            });
        }
    }
    Ok(Viewport {
        center,
        radius,
        width: (x_hi - x_lo + 1).max(0) as usize,
        cells,
    })
}

/// What `viewer` sees around itself, out to its `view` stat.
pub fn look(world: &World, blocks: &dyn BlockCatalog, viewer: &Actor) -> Result<Viewport> {
    let radius = viewer.stat(keys::VIEW)?.max(0) as usize;
    let pos = viewer.position;
    viewport(world, blocks, (pos.x as i64, pos.y as i64), radius)
}

/// Remote view from a surveyor block.
///
/// The window is centered `distance` cells away along each of `directions`
/// and has radius `distance`. A viewer not standing on the `surveyor` block
/// gets its ordinary [`look`].
pub fn survey(
    world: &World,
    blocks: &dyn BlockCatalog,
    viewer: &Actor,
    surveyor: &str,
    distance: usize,
    directions: &[Direction],
) -> Result<Viewport> {
    let pos = viewer.position;
    let surveyor = blocks.block_named(surveyor)?.id;
    if world.block_at(pos.x as i64, pos.y as i64)? != surveyor {
        return look(world, blocks, viewer);
    }

    let (mut x, mut y) = (pos.x as i64, pos.y as i64);
    let d = distance as i64;
    for direction in [Direction::North, Direction::South, Direction::East, Direction::West] {
        if !directions.contains(&direction) {
            continue;
        }
        match direction {
            Direction::North | Direction::South => y += direction.offset(d),
            Direction::East | Direction::West => x += direction.offset(d),
        }
    }
    viewport(world, blocks, (x, y), distance)
}
