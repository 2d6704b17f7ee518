//! Breadth-first pathfinding over maze path cells
//!
//! Neighbours are expanded in the fixed order down, up, right, left, so a
//! given grid always yields the same route.

use std::collections::VecDeque;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::core::types::CellPos;
use crate::maze::grid::Grid;

/// Shortest 4-connected route from `start` to `goal`, both ends included
///
/// Returns None if either end is not a path cell or the goal is unreachable.
pub fn shortest_path(grid: &Grid, start: CellPos, goal: CellPos) -> Option<Vec<CellPos>> {
    if !grid.is_path(start) || !grid.is_path(goal) {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let width = grid.width();
    let index = |p: CellPos| p.y as usize * width + p.x as usize;
    let mut came_from: Vec<Option<CellPos>> = vec![None; grid.area()];
    let mut visited = vec![false; grid.area()];
    let mut queue = VecDeque::new();

    visited[index(start)] = true;
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        if current == goal {
            return Some(reconstruct_path(&came_from, width, current));
        }

        for neighbor in grid.open_neighbors(current) {
            let i = index(neighbor);
            if visited[i] {
                continue;
            }
            visited[i] = true;
            came_from[i] = Some(current);
            queue.push_back(neighbor);
        }
    }

    None
}

fn reconstruct_path(came_from: &[Option<CellPos>], width: usize, mut current: CellPos) -> Vec<CellPos> {
    let mut path = vec![current];
    while let Some(prev) = came_from[current.y as usize * width + current.x as usize] {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Pick the Manhattan-closest candidate, then route to it with BFS
///
/// This is a two-stage heuristic, not a multi-source search: the target is
/// chosen by straight-line grid distance and may not be the closest by path.
/// Ties keep the first candidate. Returns None when there are no candidates
/// or the chosen one is unreachable.
pub fn nearest_of(
    grid: &Grid,
    start: CellPos,
    candidates: &[CellPos],
) -> Option<(CellPos, Vec<CellPos>)> {
    let target = candidates
        .iter()
        .copied()
        .min_by_key(|c| start.manhattan(c))?;
    let path = shortest_path(grid, start, target)?;
    Some((target, path))
}

/// Uniformly random open neighbour, or `current` when boxed in
pub fn random_adjacent_move<R: Rng + ?Sized>(grid: &Grid, current: CellPos, rng: &mut R) -> CellPos {
    let options: Vec<CellPos> = grid.open_neighbors(current).collect();
    options.choose(rng).copied().unwrap_or(current)
}

/// Every path cell reachable from `start`
pub fn reachable_from(grid: &Grid, start: CellPos) -> Vec<CellPos> {
    if !grid.is_path(start) {
        return Vec::new();
    }

    let width = grid.width();
    let mut visited = vec![false; grid.area()];
    let mut queue = VecDeque::from([start]);
    let mut reached = Vec::new();
    visited[start.y as usize * width + start.x as usize] = true;

    while let Some(current) = queue.pop_front() {
        reached.push(current);
        for neighbor in grid.open_neighbors(current) {
            let i = neighbor.y as usize * width + neighbor.x as usize;
            if !visited[i] {
                visited[i] = true;
                queue.push_back(neighbor);
            }
        }
    }

    reached
}
