// session.rs - Session controller: the maze/result state machine
//
// INITIAL --generate--> MAZE_READY --solve--> RESULTS_READY
//
// generate is valid from every phase and lands in MAZE_READY; solve and
// select_heuristic keep RESULTS_READY. A failed request keeps the phase.
//
// The controller is the only writer of SessionState. Renderers and the
// comparator get read-only borrows for the duration of one call.

use crate::chart::{ChartAdapter, ChartBackend};
use crate::compare::{compare, Comparison, CANONICAL_ORDER};
use crate::error_handling::{PreconditionViolation, ProtocolError, Result, SessionError};
use crate::grid::{render, RenderedGrid};
use crate::protocol::{
    validate_solve, GenerateOptions, GenerateRequest, GeneratedMaze, SolveRequest,
};
use crate::service::MazeService;
use crate::surface::{
    Controls, ResultCard, Surface, Trigger, GENERATE_LABEL, GENERATING_LABEL, SOLVE_LABEL,
    SOLVING_LABEL,
};
use crate::types::{Maze, MazeSize, Position, ResultSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initial,
    MazeReady,
    ResultsReady,
}

/// Everything a user can do, routed by value rather than by per-widget
/// callbacks. View requests carry the heuristic name they target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserEvent {
    SizeChanged(u32),
    Generate,
    Solve,
    ViewSolution(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    maze: Option<Maze>,
    start: Position,
    end: Position,
    results: Option<ResultSet>,
    selected: Option<String>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            maze: None,
            start: Position::default(),
            end: Position::default(),
            results: None,
            selected: None,
        }
    }
}

impl SessionState {
    pub fn maze(&self) -> Option<&Maze> {
        self.maze.as_ref()
    }

    pub fn start(&self) -> Position {
        self.start
    }

    pub fn end(&self) -> Position {
        self.end
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn phase(&self) -> Phase {
        match (&self.maze, &self.results) {
            (None, _) => Phase::Initial,
            (Some(_), None) => Phase::MazeReady,
            (Some(_), Some(_)) => Phase::ResultsReady,
        }
    }

    /// Grid for the current maze with the selected heuristic's overlay, if any.
    pub fn render_grid(&self) -> Option<RenderedGrid> {
        let maze = self.maze.as_ref()?;
        let overlay = self
            .selected
            .as_ref()
            .and_then(|name| self.results.as_ref()?.get(name))
            .map(|result| &result.overlay);
        Some(render(maze, self.start, self.end, overlay))
    }
}

pub struct SessionController<S, V, B>
where
    S: MazeService,
    V: Surface,
    B: ChartBackend,
{
    service: S,
    surface: V,
    chart: ChartAdapter<B>,
    state: SessionState,
    comparison: Option<Comparison>,
    generate_options: GenerateOptions,
    size: MazeSize,
    generating: bool,
    solving: bool,
}

impl<S, V, B> SessionController<S, V, B>
where
    S: MazeService,
    V: Surface,
    B: ChartBackend,
{
    pub fn new(service: S, surface: V, chart_backend: B) -> Self {
        let mut controller = Self {
            service,
            surface,
            chart: ChartAdapter::new(chart_backend),
            state: SessionState::default(),
            comparison: None,
            generate_options: GenerateOptions::default(),
            size: MazeSize::default(),
            generating: false,
            solving: false,
        };
        controller.push_controls();
        controller
    }

    pub fn with_generate_options(mut self, options: GenerateOptions) -> Self {
        self.generate_options = options;
        self
    }

    // ============= Read-only views =============

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    pub fn size(&self) -> MazeSize {
        self.size
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn surface(&self) -> &V {
        &self.surface
    }

    pub fn chart(&self) -> &ChartAdapter<B> {
        &self.chart
    }

    pub fn controls(&self) -> Controls {
        let busy = self.generating || self.solving;
        Controls {
            size: self.size,
            generate: Trigger {
                label: if self.generating { GENERATING_LABEL } else { GENERATE_LABEL },
                enabled: !busy,
            },
            solve: Trigger {
                label: if self.solving { SOLVING_LABEL } else { SOLVE_LABEL },
                enabled: !busy && self.state.maze.is_some(),
            },
        }
    }

    // ============= Event routing =============

    pub async fn dispatch(&mut self, event: UserEvent) -> Result<()> {
        log::debug!("Dispatching {:?}", event);
        match event {
            UserEvent::SizeChanged(raw) => {
                self.set_size(raw);
                Ok(())
            }
            UserEvent::Generate => {
                if !self.controls().generate.enabled {
                    return Err(self.violation(PreconditionViolation::ControlDisabled("generate")));
                }
                self.generate(self.size).await
            }
            UserEvent::Solve => {
                if !self.controls().solve.enabled {
                    return Err(self.violation(PreconditionViolation::ControlDisabled("solve")));
                }
                self.solve().await
            }
            UserEvent::ViewSolution(name) => self.select_heuristic(&name),
        }
    }

    pub fn set_size(&mut self, raw: u32) -> MazeSize {
        self.size = MazeSize::normalize(raw);
        self.push_controls();
        self.size
    }

    // ============= Transitions =============

    /// Request a fresh maze. On success the previous results are dropped; on
    /// failure nothing about the session changes.
    pub async fn generate(&mut self, size: MazeSize) -> Result<()> {
        self.generating = true;
        self.push_controls();

        let request = GenerateRequest::new(size).with_options(self.generate_options);
        let outcome = self
            .service
            .generate(&request)
            .await
            .and_then(|response| Ok(response.validate(size)?));

        self.generating = false;
        let result = match outcome {
            Ok(generated) => {
                self.size = size;
                self.adopt_maze(generated);
                Ok(())
            }
            Err(e) => Err(self.surface_failure("generating maze", e)),
        };
        self.push_controls();
        result
    }

    /// Solve the current maze with every heuristic the service offers.
    pub async fn solve(&mut self) -> Result<()> {
        if self.state.maze.is_none() {
            return Err(self.violation(PreconditionViolation::NoMaze));
        }

        self.solving = true;
        self.push_controls();

        let outcome = self.request_solutions().await;

        self.solving = false;
        let result = match outcome {
            Ok((results, comparison)) => {
                self.adopt_results(results, comparison);
                Ok(())
            }
            Err(e) => Err(self.surface_failure("solving maze", e)),
        };
        self.push_controls();
        result
    }

    /// Show `name`'s overlay. Results, ranking and chart stay as they are.
    pub fn select_heuristic(&mut self, name: &str) -> Result<()> {
        let Some(results) = self.state.results.as_ref() else {
            return Err(self.violation(PreconditionViolation::NoResults));
        };
        if !results.contains_key(name) {
            return Err(self.violation(PreconditionViolation::UnknownHeuristic(name.to_string())));
        }

        log::info!("Viewing solution for {}", name);
        self.state.selected = Some(name.to_string());
        self.redraw_grid();
        self.push_results();
        Ok(())
    }

    // ============= Internals =============

    /// Fetch, validate and rank solutions without touching session state.
    async fn request_solutions(&self) -> Result<(ResultSet, Comparison)> {
        let maze = self
            .state
            .maze
            .as_ref()
            .ok_or(PreconditionViolation::NoMaze)?;
        let request = SolveRequest {
            maze,
            start: self.state.start,
            end: self.state.end,
        };
        let response = self.service.solve(&request).await?;
        let results = validate_solve(response, maze.dimensions())?;
        let comparison = compare(&results, &CANONICAL_ORDER).map_err(ProtocolError::from)?;
        Ok((results, comparison))
    }

    fn adopt_maze(&mut self, generated: GeneratedMaze) {
        let dims = generated.maze.dimensions();
        self.state = SessionState {
            maze: Some(generated.maze),
            start: generated.start,
            end: generated.end,
            results: None,
            selected: None,
        };
        self.comparison = None;
        self.chart.release();
        self.surface.hide_results();
        log::info!(
            "Adopted {} maze (start {}, end {})",
            dims,
            self.state.start,
            self.state.end
        );
        self.redraw_grid();
    }

    fn adopt_results(&mut self, results: ResultSet, comparison: Comparison) {
        log::info!(
            "Adopted {} heuristic results, fastest is {}",
            results.len(),
            comparison.fastest
        );
        self.state.selected = Some(comparison.fastest.clone());
        self.state.results = Some(results);
        let series = comparison.chart_series();
        self.comparison = Some(comparison);

        self.redraw_grid();
        self.push_results();
        if let Err(e) = self.chart.present_series(series) {
            log::error!("Comparison chart unavailable: {}", e);
            self.surface
                .notify_error(&format!("Comparison chart unavailable: {}", e));
        }
    }

    fn redraw_grid(&mut self) {
        if let Some(grid) = self.state.render_grid() {
            self.surface.draw_grid(&grid);
        }
    }

    fn push_results(&mut self) {
        if let Some(comparison) = &self.comparison {
            let cards = ResultCard::from_comparison(comparison, self.state.selected());
            self.surface.show_results(&cards);
        }
    }

    fn push_controls(&mut self) {
        let controls = self.controls();
        self.surface.update_controls(&controls);
    }

    fn surface_failure(&mut self, action: &str, error: SessionError) -> SessionError {
        log::error!("Error {}: {}", action, error);
        if error.is_user_facing() {
            self.surface
                .notify_error(&format!("Error {}: {}. Please try again.", action, error));
        }
        error
    }

    fn violation(&self, violation: PreconditionViolation) -> SessionError {
        match violation {
            PreconditionViolation::ControlDisabled(_) => {
                log::warn!("Ignored event in {:?}: {}", self.phase(), violation)
            }
            _ => log::error!("Precondition violated in {:?}: {}", self.phase(), violation),
        }
        SessionError::Precondition(violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellCategory;
    use crate::types::{HeuristicResult, SolutionOverlay};

    fn maze() -> Maze {
        Maze::new(vec![vec![0, 0, 0], vec![1, 1, 0], vec![0, 0, 0]]).unwrap()
    }

    #[test]
    fn test_phase_follows_contents() {
        let mut state = SessionState::default();
        assert_eq!(state.phase(), Phase::Initial);
        assert!(state.render_grid().is_none());

        state.maze = Some(maze());
        state.end = Position::new(2, 0);
        assert_eq!(state.phase(), Phase::MazeReady);

        let overlay = SolutionOverlay::new(vec![vec![0, 2, 2], vec![0, 0, 2], vec![2, 2, 2]]).unwrap();
        state.results = Some(
            [("KNN".to_string(), HeuristicResult { time: 0.1, overlay })]
                .into_iter()
                .collect(),
        );
        assert_eq!(state.phase(), Phase::ResultsReady);
    }

    #[test]
    fn test_render_grid_uses_selected_overlay() {
        let overlay = SolutionOverlay::new(vec![vec![0, 2, 2], vec![0, 0, 2], vec![2, 2, 2]]).unwrap();
        let mut state = SessionState {
            maze: Some(maze()),
            start: Position::new(0, 0),
            end: Position::new(2, 0),
            results: Some(
                [("KNN".to_string(), HeuristicResult { time: 0.1, overlay })]
                    .into_iter()
                    .collect(),
            ),
            selected: None,
        };
        assert_eq!(state.render_grid().unwrap().count(CellCategory::Solution), 0);

        state.selected = Some("KNN".to_string());
        let grid = state.render_grid().unwrap();
        // (2,0) is the end cell, so it stays End
        assert_eq!(grid.count(CellCategory::Solution), 5);
        assert_eq!(grid.get(Position::new(2, 0)), Some(CellCategory::End));
    }
}
