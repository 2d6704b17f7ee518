//! Wall/path grid and its plain-text map format
//!
//! Map files hold one row per line: `#` is a wall, `.` or a space is a path.
//! Saving always writes `.` for paths, so load → save is stable.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::MapLoadError;
use crate::core::types::{CellPos, Direction};

/// Kind of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Path,
}

impl Cell {
    fn to_char(self) -> char {
        match self {
            Cell::Wall => '#',
            Cell::Path => '.',
        }
    }
}

/// Row-major 2D grid of walls and paths
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid filled with `fill`
    pub fn filled(width: usize, height: usize, fill: Cell) -> Self {
        Self {
            width,
            height,
            cells: vec![fill; width * height],
        }
    }

    /// A grid without any walls
    pub fn open(width: usize, height: usize) -> Self {
        Self::filled(width, height, Cell::Path)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells (walls included)
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    #[inline]
    fn index(&self, pos: CellPos) -> Option<usize> {
        let x = usize::try_from(pos.x).ok()?;
        let y = usize::try_from(pos.y).ok()?;
        if x < self.width && y < self.height {
            Some(y * self.width + x)
        } else {
            None
        }
    }

    #[inline]
    pub fn in_bounds(&self, pos: CellPos) -> bool {
        self.index(pos).is_some()
    }

    #[inline]
    pub fn get(&self, pos: CellPos) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Out-of-bounds writes are ignored
    pub fn set(&mut self, pos: CellPos, cell: Cell) {
        if let Some(i) = self.index(pos) {
            self.cells[i] = cell;
        }
    }

    /// True for in-bounds path cells
    #[inline]
    pub fn is_path(&self, pos: CellPos) -> bool {
        self.get(pos) == Some(Cell::Path)
    }

    /// All path cells in row-major order
    pub fn path_cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            (*cell == Cell::Path).then(|| {
                CellPos::new((i % self.width) as i32, (i / self.width) as i32)
            })
        })
    }

    /// Path neighbours in breadth-first visitation order
    pub fn open_neighbors(&self, pos: CellPos) -> impl Iterator<Item = CellPos> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |d| pos.step(d))
            .filter(move |n| self.is_path(*n))
    }

    /// Parse the text map format
    pub fn parse(text: &str) -> Result<Self, MapLoadError> {
        let rows: Vec<&str> = text
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();
        // Trailing blank lines carry no cells
        let row_count = rows
            .iter()
            .rposition(|line| !line.is_empty())
            .map_or(0, |last| last + 1);
        if row_count == 0 {
            return Err(MapLoadError::Empty);
        }

        let width = rows[0].chars().count();
        let mut cells = Vec::with_capacity(width * row_count);

        for (line_index, line) in rows[..row_count].iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(MapLoadError::RaggedRow {
                    line: line_index + 1,
                    expected: width,
                    found,
                });
            }
            for (column, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' => Cell::Wall,
                    '.' | ' ' => Cell::Path,
                    other => {
                        return Err(MapLoadError::UnknownCharacter {
                            ch: other,
                            line: line_index + 1,
                            column: column + 1,
                        })
                    }
                };
                cells.push(cell);
            }
        }

        Ok(Self {
            width,
            height: row_count,
            cells,
        })
    }

    /// Load a map file
    pub fn load(path: &Path) -> Result<Self, MapLoadError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Write the map file format
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        fs::write(path, self.to_string())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width.max(1)) {
            let line: String = row.iter().map(|c| c.to_char()).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "#####\n#...#\n#.#.#\n#...#\n#####\n";

    #[test]
    fn test_parse_sample() {
        let grid = Grid::parse(SAMPLE).unwrap();
        assert_eq!(grid.width(), 5);
        assert_eq!(grid.height(), 5);
        assert!(grid.is_path(CellPos::new(1, 1)));
        assert!(!grid.is_path(CellPos::new(2, 2)));
        assert!(!grid.is_path(CellPos::new(-1, 0)));
        assert_eq!(grid.path_cells().count(), 8);
    }

    #[test]
    fn test_space_is_path_and_saves_as_dot() {
        let grid = Grid::parse("###\n# #\n###").unwrap();
        assert!(grid.is_path(CellPos::new(1, 1)));
        assert_eq!(grid.to_string(), "###\n#.#\n###\n");
    }

    #[test]
    fn test_round_trip_is_stable() {
        let grid = Grid::parse(SAMPLE).unwrap();
        assert_eq!(grid.to_string(), SAMPLE);
        assert_eq!(Grid::parse(&grid.to_string()).unwrap(), grid);
    }

    #[test]
    fn test_crlf_lines() {
        let grid = Grid::parse("#.#\r\n...\r\n").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Grid::parse("###\n##\n").unwrap_err();
        assert!(matches!(
            err,
            MapLoadError::RaggedRow { line: 2, expected: 3, found: 2 }
        ));
    }

    #[test]
    fn test_unknown_character_rejected() {
        let err = Grid::parse("#p#\n").unwrap_err();
        assert!(matches!(err, MapLoadError::UnknownCharacter { ch: 'p', line: 1, column: 2 }));
    }

    #[test]
    fn test_empty_rejected() {
        assert!(matches!(Grid::parse("\n\n"), Err(MapLoadError::Empty)));
    }

    #[test]
    fn test_open_neighbors_order() {
        let grid = Grid::open(3, 3);
        let neighbors: Vec<_> = grid.open_neighbors(CellPos::new(1, 1)).collect();
        assert_eq!(
            neighbors,
            vec![
                CellPos::new(1, 2),
                CellPos::new(1, 0),
                CellPos::new(2, 1),
                CellPos::new(0, 1),
            ]
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let grid = Grid::parse(SAMPLE).unwrap();
        let path = std::env::temp_dir().join(format!("flag_maze_grid_{}.map", std::process::id()));
        grid.save(&path).unwrap();
        let loaded = Grid::load(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded, grid);
    }
}
