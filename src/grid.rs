//! Static occupancy map the rays travel through.
//!
//! Cells are addressed as `(x, y)` with `0 <= x < width` and `0 <= y < height`.
//! Every loaded grid has a solid outer ring, so any ray cast from an interior
//! cell reaches a wall before it can leave the array.

use std::fmt;
use std::fs;
use std::path::Path;

use anyhow::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Wall,
}

/// Built-in maze. The outer index is `x`, the inner index is `y`.
const DEFAULT_LAYOUT: [[u8; 16]; 15] = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 1, 0, 1, 1, 1, 0, 1, 0, 1, 1, 0, 1, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 1, 1, 1, 1, 1, 0, 1, 0, 1, 1, 1, 0, 1, 1],
    [1, 0, 1, 0, 0, 0, 1, 0, 1, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 1, 1, 1, 0, 1, 1, 1, 0, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1],
    [1, 1, 1, 0, 1, 1, 1, 1, 1, 1, 1, 0, 1, 1, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    Empty,
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    UnknownCell {
        line: usize,
        column: usize,
        ch: char,
    },
    OpenBorder {
        x: usize,
        y: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Empty => write!(f, "maze has no cells"),
            GridError::Ragged {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line} has {found} cells, expected {expected} like the first line"
            ),
            GridError::UnknownCell { line, column, ch } => {
                write!(f, "unknown cell {ch:?} at line {line}, column {column}")
            }
            GridError::OpenBorder { x, y } => {
                write!(f, "border cell ({x}, {y}) is not a wall")
            }
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    // x-major: cells[x * height + y]
    cells: Vec<Cell>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::from_fn(DEFAULT_LAYOUT.len(), DEFAULT_LAYOUT[0].len(), |x, y| {
            DEFAULT_LAYOUT[x][y] != 0
        })
    }
}

impl Grid {
    /// Builds a grid from a wall predicate. The caller is responsible for
    /// closing the border; see [`Grid::check_border`].
    pub fn from_fn(width: usize, height: usize, is_wall: impl Fn(usize, usize) -> bool) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for x in 0..width {
            for y in 0..height {
                cells.push(if is_wall(x, y) { Cell::Wall } else { Cell::Empty });
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Parses a maze description. Line `i` lists the cells with `x == i` in
    /// increasing `y`: `#` or `1` for walls, `.`, `0` or a space for empty cells.
    pub fn parse(text: &str) -> Result<Self, GridError> {
        let mut columns: Vec<Vec<Cell>> = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let mut column = Vec::with_capacity(line.len());
            for (col_no, ch) in line.chars().enumerate() {
                let cell = match ch {
                    '#' | '1' => Cell::Wall,
                    '.' | '0' | ' ' => Cell::Empty,
                    _ => {
                        return Err(GridError::UnknownCell {
                            line: line_no + 1,
                            column: col_no + 1,
                            ch,
                        });
                    }
                };
                column.push(cell);
            }
            if let Some(first) = columns.first()
                && first.len() != column.len()
            {
                return Err(GridError::Ragged {
                    line: line_no + 1,
                    expected: first.len(),
                    found: column.len(),
                });
            }
            columns.push(column);
        }

        let width = columns.len();
        let height = columns.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(GridError::Empty);
        }

        let grid = Self {
            width,
            height,
            cells: columns.into_iter().flatten().collect(),
        };
        grid.check_border()?;
        Ok(grid)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read maze {}", path.display()))?;
        let grid =
            Self::parse(&text).with_context(|| format!("invalid maze {}", path.display()))?;
        Ok(grid)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Checked lookup for callers that may hold arbitrary coordinates.
    pub fn get(&self, x: i64, y: i64) -> Option<Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[x as usize * self.height + y as usize])
    }

    /// Hot-path lookup used by the raycaster and collision checks.
    ///
    /// Out-of-range coordinates are a broken precondition: the closed border
    /// keeps every ray and every move inside the grid, so this panics instead
    /// of inventing a value.
    #[inline]
    pub fn is_wall(&self, x: i32, y: i32) -> bool {
        debug_assert!(
            x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        self.cells[x as usize * self.height + y as usize] == Cell::Wall
    }

    /// Verifies that every cell on the outer ring is a wall.
    pub fn check_border(&self) -> Result<(), GridError> {
        let (w, h) = (self.width, self.height);
        let ring = (0..w)
            .flat_map(|x| [(x, 0), (x, h - 1)])
            .chain((0..h).flat_map(|y| [(0, y), (w - 1, y)]));
        for (x, y) in ring {
            if self.cells[x * h + y] != Cell::Wall {
                return Err(GridError::OpenBorder { x, y });
            }
        }
        Ok(())
    }
}
