//! Randomized depth-first maze carving
//!
//! The grid starts as solid wall. Path cells live on the odd-coordinate
//! lattice; carving from a lattice cell opens a lattice neighbour two steps
//! away together with the wall cell between them. The result is a spanning
//! tree over the lattice, so every path cell is reachable and there are no
//! loops.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::core::error::{GameError, Result};
use crate::core::types::{CellPos, Direction};
use crate::maze::grid::{Cell, Grid};

/// Smallest accepted side length
pub const MIN_DIMENSION: usize = 3;

/// A generated maze together with the cell carving started from
#[derive(Debug, Clone)]
pub struct GeneratedMaze {
    pub grid: Grid,
    pub start: CellPos,
}

/// Seeded maze generator
pub struct MazeGenerator {
    rng: ChaCha8Rng,
}

impl MazeGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn from_rng(rng: ChaCha8Rng) -> Self {
        Self { rng }
    }

    /// Generate a maze; even sizes grow by one to stay odd
    pub fn generate(&mut self, width: usize, height: usize) -> Result<GeneratedMaze> {
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(GameError::InvalidDimensions { width, height });
        }
        let width = next_odd(width);
        let height = next_odd(height);

        let mut grid = Grid::filled(width, height, Cell::Wall);
        let lattice_w = (width - 1) / 2;
        let lattice_h = (height - 1) / 2;
        let mut visited = vec![false; lattice_w * lattice_h];

        let start_lattice = (
            self.rng.gen_range(0..lattice_w),
            self.rng.gen_range(0..lattice_h),
        );
        let start = lattice_to_cell(start_lattice);

        visited[start_lattice.1 * lattice_w + start_lattice.0] = true;
        grid.set(start, Cell::Path);

        // Each frame keeps the directions it has not tried yet
        let mut stack = vec![(start_lattice, self.shuffled_directions())];

        while let Some((current, pending)) = stack.last_mut() {
            let current = *current;
            let Some(direction) = pending.pop() else {
                stack.pop();
                continue;
            };

            let (dx, dy) = direction.delta();
            let nx = current.0 as i64 + dx as i64;
            let ny = current.1 as i64 + dy as i64;
            if nx < 0 || ny < 0 || nx >= lattice_w as i64 || ny >= lattice_h as i64 {
                continue;
            }
            let next = (nx as usize, ny as usize);
            let index = next.1 * lattice_w + next.0;
            if visited[index] {
                continue;
            }

            visited[index] = true;
            let from = lattice_to_cell(current);
            grid.set(from.step(direction), Cell::Path);
            grid.set(lattice_to_cell(next), Cell::Path);
            let directions = self.shuffled_directions();
            stack.push((next, directions));
        }

        tracing::debug!(width, height, %start, "Generated maze");
        Ok(GeneratedMaze { grid, start })
    }

    fn shuffled_directions(&mut self) -> Vec<Direction> {
        let mut directions = Direction::ALL.to_vec();
        directions.shuffle(&mut self.rng);
        directions
    }
}

/// Convenience wrapper around a freshly seeded generator
pub fn generate(width: usize, height: usize, seed: u64) -> Result<GeneratedMaze> {
    MazeGenerator::new(seed).generate(width, height)
}

fn next_odd(n: usize) -> usize {
    if n % 2 == 0 {
        n + 1
    } else {
        n
    }
}

fn lattice_to_cell((lx, ly): (usize, usize)) -> CellPos {
    CellPos::new((2 * lx + 1) as i32, (2 * ly + 1) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::pathfinding::reachable_from;

    #[test]
    fn test_dimensions_coerced_to_odd() {
        let maze = generate(10, 14, 1).unwrap();
        assert_eq!(maze.grid.width(), 11);
        assert_eq!(maze.grid.height(), 15);

        let maze = generate(9, 9, 1).unwrap();
        assert_eq!(maze.grid.width(), 9);
        assert_eq!(maze.grid.height(), 9);
    }

    #[test]
    fn test_rejects_degenerate_sizes() {
        assert!(matches!(
            generate(2, 10, 1),
            Err(GameError::InvalidDimensions { width: 2, height: 10 })
        ));
        assert!(generate(10, 0, 1).is_err());
    }

    #[test]
    fn test_minimum_maze_is_single_cell() {
        let maze = generate(3, 3, 5).unwrap();
        assert_eq!(maze.start, CellPos::new(1, 1));
        assert_eq!(maze.grid.path_cells().count(), 1);
    }

    #[test]
    fn test_all_paths_reachable_from_start() {
        let maze = generate(21, 15, 99).unwrap();
        let reachable = reachable_from(&maze.grid, maze.start);
        assert_eq!(reachable.len(), maze.grid.path_cells().count());
    }

    #[test]
    fn test_spanning_tree_cell_count() {
        // A tree over n lattice cells carves n - 1 connecting walls
        let maze = generate(11, 11, 3).unwrap();
        let lattice = 5 * 5;
        assert_eq!(maze.grid.path_cells().count(), lattice + lattice - 1);
    }

    #[test]
    fn test_border_stays_wall() {
        let maze = generate(15, 11, 8).unwrap();
        let grid = &maze.grid;
        for x in 0..grid.width() as i32 {
            assert!(!grid.is_path(CellPos::new(x, 0)));
            assert!(!grid.is_path(CellPos::new(x, grid.height() as i32 - 1)));
        }
        for y in 0..grid.height() as i32 {
            assert!(!grid.is_path(CellPos::new(0, y)));
            assert!(!grid.is_path(CellPos::new(grid.width() as i32 - 1, y)));
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let a = generate(25, 25, 42).unwrap();
        let b = generate(25, 25, 42).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.start, b.start);
    }
}
