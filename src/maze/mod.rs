//! Maze grid, generation and spatial queries

pub mod generator;
pub mod grid;
pub mod occupancy;
pub mod pathfinding;

pub use generator::{generate, GeneratedMaze, MazeGenerator};
pub use grid::{Cell, Grid};
pub use occupancy::{open_cells, Occupancy};
pub use pathfinding::{nearest_of, random_adjacent_move, reachable_from, shortest_path};
