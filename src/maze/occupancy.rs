//! Occupancy tracking and free-cell queries
//!
//! Occupancy changes every tick, so it is rebuilt from the world on demand
//! rather than cached.

use ahash::AHashSet;

use crate::core::types::CellPos;
use crate::maze::grid::Grid;

/// Cells currently taken by bases, items or soldiers
#[derive(Debug, Clone, Default)]
pub struct Occupancy {
    cells: AHashSet<CellPos>,
}

impl Occupancy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, pos: CellPos) {
        self.cells.insert(pos);
    }

    pub fn extend<I: IntoIterator<Item = CellPos>>(&mut self, cells: I) {
        self.cells.extend(cells);
    }

    pub fn is_occupied(&self, pos: CellPos) -> bool {
        self.cells.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Path cells not held by any tracked entity, in row-major order
pub fn open_cells(grid: &Grid, occupancy: &Occupancy) -> Vec<CellPos> {
    grid.path_cells()
        .filter(|pos| !occupancy.is_occupied(*pos))
        .collect()
}
