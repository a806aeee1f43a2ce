// surface.rs - Display surface contract plus a terminal implementation
//
// The session controller only ever talks to a `Surface`. What a surface does
// with a RenderedGrid (DOM cells, terminal escape codes, PNG files) is its
// own business.

use std::io::Write;
use std::path::PathBuf;

use crate::compare::{display_name, heuristic_color, Comparison};
use crate::grid::RenderedGrid;
use crate::types::{Color, MazeSize};

pub const GENERATE_LABEL: &str = "Generate Maze";
pub const GENERATING_LABEL: &str = "Generating...";
pub const SOLVE_LABEL: &str = "Solve Maze";
pub const SOLVING_LABEL: &str = "Solving...";
pub const VIEW_LABEL: &str = "View Solution";

// ============= View models =============

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub label: &'static str,
    pub enabled: bool,
}

/// State of the user-facing controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub size: MazeSize,
    pub generate: Trigger,
    pub solve: Trigger,
}

/// One entry of the results panel. Its view trigger is routed by `heuristic`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub heuristic: String,
    pub display_name: String,
    pub time: f64,
    pub color: Color,
    pub fastest: bool,
    pub active: bool,
}

impl ResultCard {
    /// Cards in ranked order, marking the fastest and the selected heuristic.
    pub fn from_comparison(comparison: &Comparison, selected: Option<&str>) -> Vec<ResultCard> {
        comparison
            .ranked
            .iter()
            .map(|(name, result)| ResultCard {
                heuristic: name.clone(),
                display_name: display_name(name),
                time: result.time,
                color: heuristic_color(name),
                fastest: *name == comparison.fastest,
                active: selected == Some(name.as_str()),
            })
            .collect()
    }

    pub fn time_label(&self) -> String {
        format!("Time: {:.6} seconds", self.time)
    }
}

// ============= Surface trait =============

pub trait Surface {
    fn draw_grid(&mut self, grid: &RenderedGrid);

    fn update_controls(&mut self, controls: &Controls);

    fn show_results(&mut self, cards: &[ResultCard]);

    fn hide_results(&mut self);

    fn notify_error(&mut self, message: &str);
}

// ============= Terminal surface =============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridStyle {
    Ansi,
    Ascii,
}

/// Writes grids, controls and result cards to any `Write` sink, and can
/// additionally snapshot every drawn grid to `grid.png`.
pub struct TerminalSurface<W: Write> {
    out: W,
    style: GridStyle,
    snapshot_dir: Option<PathBuf>,
    cell_px: u32,
    results_visible: bool,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W, style: GridStyle) -> Self {
        Self {
            out,
            style,
            snapshot_dir: None,
            cell_px: 15,
            results_visible: false,
        }
    }

    pub fn with_snapshots(mut self, dir: impl Into<PathBuf>, cell_px: u32) -> Self {
        self.snapshot_dir = Some(dir.into());
        self.cell_px = cell_px.max(1);
        self
    }

    pub fn results_visible(&self) -> bool {
        self.results_visible
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            log::warn!("Terminal write failed: {}", e);
        }
    }

    fn snapshot(&self, grid: &RenderedGrid) {
        let Some(dir) = &self.snapshot_dir else {
            return;
        };
        let path = dir.join("grid.png");
        match grid.to_image(self.cell_px).save_with_format(&path, image::ImageFormat::Png) {
            Ok(()) => log::debug!("Wrote grid snapshot to {}", path.display()),
            Err(e) => log::warn!("Failed to write grid snapshot {}: {}", path.display(), e),
        }
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn draw_grid(&mut self, grid: &RenderedGrid) {
        let text = match self.style {
            GridStyle::Ansi => grid.to_ansi(),
            GridStyle::Ascii => grid.to_ascii(),
        };
        self.emit(&format!("\n{}", text));
        self.snapshot(grid);
    }

    fn update_controls(&mut self, controls: &Controls) {
        let trigger = |t: &Trigger| {
            if t.enabled {
                format!("[{}]", t.label)
            } else {
                format!("[{} (disabled)]", t.label)
            }
        };
        let line = format!(
            "size {}  {}  {}\n",
            controls.size,
            trigger(&controls.generate),
            trigger(&controls.solve)
        );
        self.emit(&line);
    }

    fn show_results(&mut self, cards: &[ResultCard]) {
        self.results_visible = true;
        let mut text = String::from("\n Results:\n");
        for card in cards {
            text.push_str(&format!(
                " {} {:<16}{:<10} {}   [{}: view {}]\n",
                if card.active { '>' } else { ' ' },
                card.display_name,
                if card.fastest { "(Fastest)" } else { "" },
                card.time_label(),
                VIEW_LABEL,
                card.heuristic,
            ));
        }
        self.emit(&text);
    }

    fn hide_results(&mut self) {
        self.results_visible = false;
    }

    fn notify_error(&mut self, message: &str) {
        self.emit(&format!("! {}\n", message));
    }
}
