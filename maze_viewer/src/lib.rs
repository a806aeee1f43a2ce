// lib.rs - Library exports for maze-viewer
// Session controller, grid renderer, result comparator and chart adapter for
// a remote maze generation/solving service.

pub mod chart;
pub mod compare;
pub mod error_handling;
pub mod grid;
pub mod protocol;
pub mod service;
pub mod session;
pub mod surface;
pub mod types;

// Re-export commonly used types
pub use chart::{BitmapChartBackend, ChartAdapter, ChartBackend, ChartError, ChartSpec};
pub use compare::{compare, ChartSeries, CompareError, Comparison, CANONICAL_ORDER};
pub use error_handling::{
    PreconditionViolation, ProtocolError, Result, SessionError, TransportError,
};
pub use grid::{render, CellCategory, RenderedGrid};
pub use protocol::GenerateOptions;
pub use service::{HttpMazeService, MazeService};
pub use session::{Phase, SessionController, SessionState, UserEvent};
pub use surface::{Controls, GridStyle, ResultCard, Surface, TerminalSurface, Trigger};
pub use types::{
    HeuristicResult, Maze, MazeDimensions, MazeSize, Position, ResultSet, SolutionOverlay,
};
