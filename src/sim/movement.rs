use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{BlockCatalog, CreatureCatalog, EMPTY, Position, World, keys};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Axis {
    X,
    Y,
}

string_enum!(Axis {
    X => "x",
    Y => "y",
});

/// Compass direction. North is toward `y = 0`, west toward `x = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

string_enum!(Direction {
    North => "north",
    South => "south",
    East => "east",
    West => "west",
});

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::North | Direction::South => Axis::Y,
            Direction::East | Direction::West => Axis::X,
        }
    }

    /// Signed distance along the axis for moving `distance` cells this way.
    pub fn offset(self, distance: i64) -> i64 {
        match self {
            Direction::South | Direction::East => distance,
            Direction::North | Direction::West => -distance,
        }
    }
}

fn coordinate(pos: Position, axis: Axis) -> i64 {
    match axis {
        Axis::X => pos.x as i64,
        Axis::Y => pos.y as i64,
    }
}

fn cell(pos: Position, axis: Axis, along: i64) -> (i64, i64) {
    match axis {
        Axis::X => (along, pos.y as i64),
        Axis::Y => (pos.x as i64, along),
    }
}

/// Where a move of signed `distance` cells along `axis` actually ends.
///
/// The target is clamped into the grid, then every cell strictly between the
/// origin and the target is checked in order. A solid cell stops the move on
/// the cell before it. An occupied cell stops the move on that cell with
/// probability `aggression / 100` of the creature living there. A solid target
/// backs off one cell toward the origin. The other coordinate never changes.
pub fn resolve_move(
    world: &World,
    origin: Position,
    axis: Axis,
    distance: i64,
    blocks: &dyn BlockCatalog,
    creatures: &dyn CreatureCatalog,
    rng: &mut dyn RngCore,
) -> Result<usize> {
    let start = coordinate(origin, axis);
    if distance == 0 {
        return Ok(start as usize);
    }
    let last = world.extent() as i64 - 1;
    let target = start.saturating_add(distance).clamp(0, last.max(0));
    let step = (target - start).signum();
    if step == 0 {
        return Ok(start as usize);
    }

    let mut along = start + step;
    while along != target {
        let (x, y) = cell(origin, axis, along);
        if blocks.is_solid(world.block_at(x, y)?)? {
            return Ok((along - step) as usize);
        }
        let occupant = world.occupant_at(x, y)?;
        if occupant != EMPTY {
            let aggression = creatures
                .template(occupant)?
                .stats
                .int_or(keys::AGGRESSION, 0)?;
            if rng.random_range(0..100) < aggression {
                tracing::debug!(x, y, occupant, "creature blocks the way");
                return Ok(along as usize);
            }
        }
        along += step;
    }

    let (x, y) = cell(origin, axis, target);
    if blocks.is_solid(world.block_at(x, y)?)? {
        return Ok((target - step) as usize);
    }
    Ok(target as usize)
}

/// [`resolve_move`] for a compass direction, returning the full destination.
pub fn destination(
    world: &World,
    origin: Position,
    direction: Direction,
    distance: i64,
    blocks: &dyn BlockCatalog,
    creatures: &dyn CreatureCatalog,
    rng: &mut dyn RngCore,
) -> Result<Position> {
    let axis = direction.axis();
    let along = resolve_move(
        world,
        origin,
        axis,
        direction.offset(distance),
        blocks,
        creatures,
        rng,
    )?;
    Ok(match axis {
        Axis::X => Position::new(along, origin.y),
        Axis::Y => Position::new(origin.x, along),
    })
}
