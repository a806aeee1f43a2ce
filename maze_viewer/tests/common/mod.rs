// Shared fakes for the session integration tests.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use maze_viewer::chart::{ChartBackend, ChartError, ChartSpec};
use maze_viewer::protocol::{
    GenerateRequest, GenerateResponse, HeuristicPayload, SolveRequest, SolveResponse,
};
use maze_viewer::{
    Controls, MazeService, Position, RenderedGrid, ResultCard, Result, SessionController,
    Surface, TransportError,
};

pub type TestController = SessionController<ScriptedService, RecordingSurface, RecordingChartBackend>;

// ============= Service =============

/// Hands out queued responses in order. An exhausted queue looks like a
/// connection failure.
#[derive(Default)]
pub struct ScriptedService {
    generate: RefCell<VecDeque<Result<GenerateResponse>>>,
    solve: RefCell<VecDeque<Result<SolveResponse>>>,
    pub generate_requests: RefCell<Vec<GenerateRequest>>,
    pub solve_requests: RefCell<Vec<serde_json::Value>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_generate(self, response: Result<GenerateResponse>) -> Self {
        self.generate.borrow_mut().push_back(response);
        self
    }

    pub fn on_solve(self, response: Result<SolveResponse>) -> Self {
        self.solve.borrow_mut().push_back(response);
        self
    }
}

fn unreachable_service(endpoint: &str) -> maze_viewer::SessionError {
    TransportError::Request {
        endpoint: endpoint.to_string(),
        message: "connection refused".to_string(),
    }
    .into()
}

impl MazeService for ScriptedService {
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        self.generate_requests.borrow_mut().push(request.clone());
        self.generate
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unreachable_service("/generate_maze")))
    }

    async fn solve(&self, request: &SolveRequest<'_>) -> Result<SolveResponse> {
        self.solve_requests
            .borrow_mut()
            .push(serde_json::to_value(request).unwrap());
        self.solve
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(unreachable_service("/solve_maze")))
    }
}

// ============= Surface =============

#[derive(Default)]
pub struct RecordingSurface {
    pub grids: Vec<RenderedGrid>,
    pub controls: Vec<Controls>,
    pub cards: Option<Vec<ResultCard>>,
    pub errors: Vec<String>,
}

impl RecordingSurface {
    pub fn last_grid(&self) -> &RenderedGrid {
        self.grids.last().expect("no grid drawn")
    }

    pub fn last_controls(&self) -> &Controls {
        self.controls.last().expect("no controls pushed")
    }

    pub fn results_visible(&self) -> bool {
        self.cards.is_some()
    }
}

impl Surface for RecordingSurface {
    fn draw_grid(&mut self, grid: &RenderedGrid) {
        self.grids.push(grid.clone());
    }

    fn update_controls(&mut self, controls: &Controls) {
        self.controls.push(controls.clone());
    }

    fn show_results(&mut self, cards: &[ResultCard]) {
        self.cards = Some(cards.to_vec());
    }

    fn hide_results(&mut self) {
        self.cards = None;
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

// ============= Chart backend =============

#[derive(Default)]
pub struct RecordingChartBackend {
    pub created: usize,
    pub live: Vec<usize>,
    pub specs: Vec<ChartSpec>,
    pub always_fail: bool,
}

impl RecordingChartBackend {
    pub fn failing() -> Self {
        Self {
            always_fail: true,
            ..Self::default()
        }
    }
}

impl ChartBackend for RecordingChartBackend {
    type Handle = usize;

    fn create(&mut self, spec: &ChartSpec) -> std::result::Result<usize, ChartError> {
        if self.always_fail {
            return Err(ChartError::Backend("no drawing context".into()));
        }
        self.created += 1;
        self.live.push(self.created);
        self.specs.push(spec.clone());
        Ok(self.created)
    }

    fn destroy(&mut self, handle: usize) {
        self.live.retain(|&h| h != handle);
    }
}

// ============= Fixtures =============

/// 5x5 maze with a single corridor from (1,1) to (3,3).
pub fn corridor_maze() -> Vec<Vec<i32>> {
    vec![
        vec![1, 1, 1, 1, 1],
        vec![1, 0, 0, 0, 1],
        vec![1, 1, 1, 0, 1],
        vec![1, 0, 0, 0, 1],
        vec![1, 1, 1, 1, 1],
    ]
}

pub fn generated(maze: Vec<Vec<i32>>, start: (usize, usize), end: (usize, usize)) -> GenerateResponse {
    GenerateResponse {
        maze,
        start: Position::new(start.0, start.1),
        end: Position::new(end.0, end.1),
    }
}

pub fn corridor() -> GenerateResponse {
    generated(corridor_maze(), (1, 1), (3, 3))
}

/// The corridor maze with `path` cells marked as solution.
pub fn overlay(path: &[(usize, usize)]) -> Vec<Vec<i32>> {
    let mut grid = corridor_maze();
    for &(r, c) in path {
        grid[r][c] = 2;
    }
    grid
}

pub fn solved(entries: &[(&str, f64, Vec<Vec<i32>>)]) -> SolveResponse {
    entries
        .iter()
        .map(|(name, time, grid)| {
            (
                name.to_string(),
                HeuristicPayload {
                    time: *time,
                    solved_maze: grid.clone(),
                    display_order: None,
                },
            )
        })
        .collect::<HashMap<_, _>>()
}

/// Three heuristics where KNN is fastest and each marks a different path.
pub fn three_heuristics() -> SolveResponse {
    solved(&[
        ("manhattan", 0.002, overlay(&[(1, 2)])),
        ("KNN", 0.0015, overlay(&[(1, 2), (1, 3), (2, 3)])),
        ("decision_tree", 0.003, overlay(&[(2, 3)])),
    ])
}

pub fn controller(service: ScriptedService) -> TestController {
    SessionController::new(service, RecordingSurface::default(), RecordingChartBackend::default())
}
