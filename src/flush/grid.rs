use std::fmt::Display;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use crate::error::{Result, WorldError};
use crate::model::{Grid, World};

pub const TERRAIN_FILE: &str = "world-map-save.txt";
pub const OCCUPANCY_FILE: &str = "mob-map-save.txt";

/// Write a grid as whitespace-separated integers, one row of cells per line.
pub fn save_grid<T: Copy + Display>(grid: &Grid<T>, path: &Path) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    let extent = grid.extent().max(1);
    for row in grid.cells().chunks(extent) {
        for cell in row {
            write!(writer, "{cell} ")?;
        }
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read exactly `extent²` integers written by [`save_grid`].
///
/// Line breaks carry no meaning; only the token count and order do.
pub fn load_grid<T>(path: &Path, extent: usize) -> Result<Grid<T>>
where
    T: Copy + FromStr,
{
    let text = fs::read_to_string(path)?;
    let cells = text
        .split_whitespace()
        .enumerate()
        .map(|(i, token)| {
            token.parse::<T>().map_err(|_| {
                WorldError::MalformedSave(format!(
                    "{}: token {i} is {token:?}, expected a non-negative integer",
                    path.display()
                ))
            })
        })
        .collect::<Result<Vec<T>>>()?;
    Grid::from_cells(extent, cells)
}

/// Save both grids into `dir`, creating it if needed.
pub fn save_world(world: &World, dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    save_grid(world.terrain(), &dir.join(TERRAIN_FILE))?;
    save_grid(world.occupancy(), &dir.join(OCCUPANCY_FILE))?;
    tracing::info!(dir = %dir.display(), extent = world.extent(), "world saved");
    Ok(())
}

/// Load both grids from `dir`. The result is not checked against any catalog;
/// call [`World::validate`] for that.
pub fn load_world(dir: &Path, extent: usize) -> Result<World> {
    let terrain = load_grid(&dir.join(TERRAIN_FILE), extent)?;
    let occupancy = load_grid(&dir.join(OCCUPANCY_FILE), extent)?;
    let world = World::from_grids(terrain, occupancy)?;
    tracing::info!(dir = %dir.display(), extent, "world loaded");
    Ok(world)
}

/// True when both grid files exist in `dir`.
pub fn world_saved(dir: &Path) -> bool {
    dir.join(TERRAIN_FILE).is_file() && dir.join(OCCUPANCY_FILE).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockId;
    use crate::testutil;

    #[test]
    fn written_in_row_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        let mut grid = Grid::filled(2, 0u32);
        grid.set(1, 0, 3).unwrap();
        grid.set(0, 1, 7).unwrap();
        save_grid(&grid, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "0 3 \n7 0 \n");
    }

    #[test]
    fn loads_any_whitespace_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        fs::write(&path, "1 2\n\n 3\t4 ").unwrap();
        let grid: Grid<BlockId> = load_grid(&path, 2).unwrap();
        assert_eq!(grid.cells(), &[1, 2, 3, 4]);
    }

    #[test]
    fn wrong_token_count_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        fs::write(&path, "1 2 3").unwrap();
        assert!(matches!(
            load_grid::<BlockId>(&path, 2),
            Err(WorldError::MalformedSave(_))
        ));
        fs::write(&path, "1 2 3 4 5").unwrap();
        assert!(matches!(
            load_grid::<BlockId>(&path, 2),
            Err(WorldError::MalformedSave(_))
        ));
    }

    #[test]
    fn bad_tokens_are_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.txt");
        for text in ["1 2 x 4", "1 2 -3 4", "1 2 3.5 4"] {
            fs::write(&path, text).unwrap();
            assert!(
                matches!(load_grid::<BlockId>(&path, 2), Err(WorldError::MalformedSave(_))),
                "{text:?} should not load"
            );
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_world(dir.path(), 4),
            Err(WorldError::Io(_))
        ));
        assert!(!world_saved(dir.path()));
    }

    #[test]
    fn world_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut world = testutil::open_world(5);
        world.set_block(4, 0, testutil::WALL).unwrap();
        world.set_occupant(0, 4, testutil::RAT).unwrap();
        save_world(&world, dir.path()).unwrap();
        assert!(world_saved(dir.path()));
        assert_eq!(load_world(dir.path(), 5).unwrap(), world);
        assert!(load_world(dir.path(), 4).is_err());
    }
}
