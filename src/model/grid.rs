// Dense square grid stored row by row: index = x + y * extent.
//
// Row-major order (y outer, x inner) is also the order grids are generated
// and written to save files, so `cells()` can be streamed straight out.

use crate::error::{Result, WorldError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    extent: usize,
    cells: Vec<T>,
}

impl<T: Copy> Grid<T> {
    pub fn filled(extent: usize, value: T) -> Self {
        Self {
            extent,
            cells: vec![value; extent * extent],
        }
    }

    /// Wrap row-major cells. Fails if the cell count is not `extent²`.
    pub fn from_cells(extent: usize, cells: Vec<T>) -> Result<Self> {
        if cells.len() != extent * extent {
            return Err(WorldError::MalformedSave(format!(
                "expected {} cells for a {extent}x{extent} grid, found {}",
                extent * extent,
                cells.len()
            )));
        }
        Ok(Self { extent, cells })
    }

    pub fn extent(&self) -> usize {
        self.extent
    }

    pub fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.extent && (y as usize) < self.extent
    }

    fn index(&self, x: i64, y: i64) -> Result<usize> {
        if self.in_bounds(x, y) {
            Ok(x as usize + y as usize * self.extent)
        } else {
            Err(WorldError::OutOfBounds {
                x,
                y,
                extent: self.extent,
            })
        }
    }

    pub fn get(&self, x: i64, y: i64) -> Result<T> {
        Ok(self.cells[self.index(x, y)?])
    }

    pub fn set(&mut self, x: i64, y: i64, value: T) -> Result<()> {
        let i = self.index(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }
}
