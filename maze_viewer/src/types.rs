// types.rs - Shared type definitions for maze, overlay and solve-result data
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::error_handling::ProtocolError;

/// Cell code for an open cell in a maze grid.
pub const OPEN: u8 = 0;
/// Cell code for a wall in a maze grid.
pub const WALL: u8 = 1;
/// Overlay code marking a cell that lies on a solution path.
pub const ON_PATH: i32 = 2;

// ============================================================================
// POSITIONS & DIMENSIONS
// ============================================================================

/// A (row, column) pair, 0-indexed. Travels on the wire as `[row, col]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl Default for Position {
    /// Both session positions start out at (1, 1) before any maze exists.
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl From<[usize; 2]> for Position {
    fn from(pair: [usize; 2]) -> Self {
        Self::new(pair[0], pair[1])
    }
}

impl From<Position> for [usize; 2] {
    fn from(pos: Position) -> [usize; 2] {
        [pos.row, pos.col]
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MazeDimensions {
    pub rows: usize,
    pub cols: usize,
}

impl MazeDimensions {
    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }
}

impl fmt::Display for MazeDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Measure a raw wire grid, rejecting empty and ragged shapes.
pub fn grid_dimensions<T>(grid: &[Vec<T>]) -> Result<MazeDimensions, ProtocolError> {
    let first = grid.first().ok_or(ProtocolError::EmptyGrid)?;
    let cols = first.len();
    if cols == 0 {
        return Err(ProtocolError::EmptyGrid);
    }
    for (row, cells) in grid.iter().enumerate() {
        if cells.len() != cols {
            return Err(ProtocolError::RaggedGrid {
                row,
                expected: cols,
                actual: cells.len(),
            });
        }
    }
    Ok(MazeDimensions {
        rows: grid.len(),
        cols,
    })
}

// ============================================================================
// MAZE
// ============================================================================

/// A rectangular grid of cell codes (0 = open, 1 = wall).
///
/// Only constructible through [`Maze::new`], so every `Maze` in the program is
/// non-empty, rectangular and holds nothing but open/wall codes. Immutable
/// once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Maze {
    cells: Vec<Vec<u8>>,
    #[serde(skip)]
    dims: MazeDimensions,
}

impl Maze {
    pub fn new(grid: Vec<Vec<i32>>) -> Result<Self, ProtocolError> {
        let dims = grid_dimensions(&grid)?;
        let mut cells = Vec::with_capacity(dims.rows);
        for (row, raw) in grid.into_iter().enumerate() {
            let mut out = Vec::with_capacity(dims.cols);
            for (col, value) in raw.into_iter().enumerate() {
                match value {
                    0 => out.push(OPEN),
                    1 => out.push(WALL),
                    _ => return Err(ProtocolError::InvalidCell { row, col, value }),
                }
            }
            cells.push(out);
        }
        Ok(Self { cells, dims })
    }

    #[inline]
    pub fn dimensions(&self) -> MazeDimensions {
        self.dims
    }

    #[inline]
    pub fn contains(&self, pos: Position) -> bool {
        self.dims.contains(pos)
    }

    /// Cell code at `pos`. Panics when `pos` is out of bounds.
    #[inline]
    pub fn cell(&self, pos: Position) -> u8 {
        self.cells[pos.row][pos.col]
    }

    #[inline]
    pub fn is_wall(&self, pos: Position) -> bool {
        self.cell(pos) == WALL
    }
}

// ============================================================================
// SOLUTION OVERLAY & RESULTS
// ============================================================================

/// Marker grid with the same shape as its maze; code 2 means "on path".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolutionOverlay {
    marks: Vec<Vec<i32>>,
    dims: MazeDimensions,
}

impl SolutionOverlay {
    pub fn new(marks: Vec<Vec<i32>>) -> Result<Self, ProtocolError> {
        let dims = grid_dimensions(&marks)?;
        Ok(Self { marks, dims })
    }

    #[inline]
    pub fn dimensions(&self) -> MazeDimensions {
        self.dims
    }

    #[inline]
    pub fn is_on_path(&self, pos: Position) -> bool {
        self.marks[pos.row][pos.col] == ON_PATH
    }

    pub fn path_len(&self) -> usize {
        self.marks
            .iter()
            .flatten()
            .filter(|&&mark| mark == ON_PATH)
            .count()
    }
}

/// Outcome of one named heuristic: elapsed seconds plus its path overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct HeuristicResult {
    pub time: f64,
    pub overlay: SolutionOverlay,
}

/// Heuristic name -> result. Keys are unique; iteration order carries no meaning.
pub type ResultSet = HashMap<String, HeuristicResult>;

// ============================================================================
// SIZE CONTROL
// ============================================================================

/// Edge length requested from the generator. Always odd, always within
/// [`MazeSize::MIN`, `MazeSize::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct MazeSize(u32);

impl MazeSize {
    /// Smallest size whose start (1,1) and end (n-2,n-2) are distinct cells.
    pub const MIN: u32 = 5;
    pub const MAX: u32 = 101;
    pub const DEFAULT: u32 = 15;

    /// Snap a raw control value onto the allowed odd range. Even values step
    /// down by one before clamping.
    pub fn normalize(raw: u32) -> Self {
        let odd = if raw % 2 == 0 { raw.saturating_sub(1) } else { raw };
        Self(odd.clamp(Self::MIN, Self::MAX))
    }

    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for MazeSize {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for MazeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// COLOR
// ============================================================================

/// 8-bit sRGB color, written as `#RRGGBB` in the palettes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    #[inline]
    pub fn to_rgba(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, 255])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
