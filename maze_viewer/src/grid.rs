// grid.rs - Grid renderer: categorizes every maze cell for display
//
// `render` is the pure part. The `to_ansi`/`to_ascii`/`to_image` methods turn
// a finished RenderedGrid into something a terminal or a PNG file can show.

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::types::{Color, Maze, Position, SolutionOverlay};

/// Largest square a single cell may occupy in a bitmap.
pub const MAX_CELL_PX: u32 = 64;

/// Visual category of one cell. Exactly one applies per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellCategory {
    Start,
    End,
    Solution,
    Wall,
    Path,
}

impl CellCategory {
    pub const ALL: [CellCategory; 5] = [
        CellCategory::Start,
        CellCategory::End,
        CellCategory::Solution,
        CellCategory::Wall,
        CellCategory::Path,
    ];

    pub fn color(self) -> Color {
        match self {
            CellCategory::Start => Color::rgb(0x4C, 0xAF, 0x50),
            CellCategory::End => Color::rgb(0xF4, 0x43, 0x36),
            CellCategory::Solution => Color::rgb(0x21, 0x96, 0xF3),
            CellCategory::Wall => Color::rgb(0x33, 0x33, 0x33),
            CellCategory::Path => Color::rgb(0xFF, 0xFF, 0xFF),
        }
    }

    fn ansi(self) -> &'static str {
        match self {
            CellCategory::Start => "\x1b[42;1m  \x1b[0m",
            CellCategory::End => "\x1b[41;1m  \x1b[0m",
            CellCategory::Solution => "\x1b[44m  \x1b[0m",
            CellCategory::Wall => "\x1b[47m  \x1b[0m",
            CellCategory::Path => "\x1b[0m  ",
        }
    }

    fn ascii(self) -> &'static str {
        match self {
            CellCategory::Start => "SS",
            CellCategory::End => "EE",
            CellCategory::Solution => "..",
            CellCategory::Wall => "##",
            CellCategory::Path => "  ",
        }
    }

    fn legend(self) -> &'static str {
        match self {
            CellCategory::Start => "Start point",
            CellCategory::End => "End point",
            CellCategory::Solution => "Solution path",
            CellCategory::Wall => "Wall",
            CellCategory::Path => "Open path (unvisited)",
        }
    }
}

/// Precedence: start, end, solution overlay, wall, open path.
#[inline]
pub fn categorize(
    maze: &Maze,
    start: Position,
    end: Position,
    overlay: Option<&SolutionOverlay>,
    pos: Position,
) -> CellCategory {
    if pos == start {
        CellCategory::Start
    } else if pos == end {
        CellCategory::End
    } else if overlay.is_some_and(|o| o.is_on_path(pos)) {
        CellCategory::Solution
    } else if maze.is_wall(pos) {
        CellCategory::Wall
    } else {
        CellCategory::Path
    }
}

/// Categorize every cell of `maze`. Always a full recompute.
///
/// # Panics
///
/// When `start` or `end` lies outside the maze, or when `overlay` does not
/// have the maze's dimensions. Validated protocol data never does either.
pub fn render(
    maze: &Maze,
    start: Position,
    end: Position,
    overlay: Option<&SolutionOverlay>,
) -> RenderedGrid {
    let dims = maze.dimensions();
    assert!(dims.contains(start), "start {start} outside {dims} maze");
    assert!(dims.contains(end), "end {end} outside {dims} maze");
    if let Some(overlay) = overlay {
        assert_eq!(overlay.dimensions(), dims, "overlay shape differs from maze");
    }

    let mut cells = Vec::with_capacity(dims.cell_count());
    for row in 0..dims.rows {
        for col in 0..dims.cols {
            cells.push(categorize(maze, start, end, overlay, Position::new(row, col)));
        }
    }

    RenderedGrid {
        rows: dims.rows,
        cols: dims.cols,
        cells,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGrid {
    rows: usize,
    cols: usize,
    cells: Vec<CellCategory>,
}

impl RenderedGrid {
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn get(&self, pos: Position) -> Option<CellCategory> {
        if pos.row < self.rows && pos.col < self.cols {
            Some(self.cells[pos.row * self.cols + pos.col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[CellCategory] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn count(&self, category: CellCategory) -> usize {
        self.cells.iter().filter(|&&c| c == category).count()
    }

    /// Colored terminal rendering inside a double-line border, plus legend.
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        out.push('╔');
        out.push_str(&"══".repeat(self.cols));
        out.push_str("╗\n");
        for row in 0..self.rows {
            out.push('║');
            for &cell in self.row(row) {
                out.push_str(cell.ansi());
            }
            out.push_str("║\n");
        }
        out.push('╚');
        out.push_str(&"══".repeat(self.cols));
        out.push_str("╝\n\n Legend:\n");
        for category in CellCategory::ALL {
            out.push_str(&format!(" {} {}\n", category.ansi(), category.legend()));
        }
        out
    }

    /// Plain-character fallback for terminals without color support.
    pub fn to_ascii(&self) -> String {
        let border = format!("+{}+\n", "-".repeat(self.cols * 2));
        let mut out = border.clone();
        for row in 0..self.rows {
            out.push('|');
            for &cell in self.row(row) {
                out.push_str(cell.ascii());
            }
            out.push_str("|\n");
        }
        out.push_str(&border);
        out.push_str("\n Legend:\n");
        for category in CellCategory::ALL {
            out.push_str(&format!(" {} - {}\n", category.ascii(), category.legend()));
        }
        out
    }

    /// Bitmap with one `cell_px` square per cell. `cell_px` is clamped to
    /// `1..=MAX_CELL_PX`.
    pub fn to_image(&self, cell_px: u32) -> RgbaImage {
        let cell_px = cell_px.clamp(1, MAX_CELL_PX);
        let width = self.cols as u32 * cell_px;
        let height = self.rows as u32 * cell_px;
        ImageBuffer::from_fn(width, height, |x, y| {
            let pos = Position::new((y / cell_px) as usize, (x / cell_px) as usize);
            self.get(pos)
                .map(|cell| cell.color().to_rgba())
                .unwrap_or(Rgba([0, 0, 0, 255]))
        })
    }
}
