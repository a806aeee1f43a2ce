// protocol.rs - Wire models for the generate/solve service and their validation
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error_handling::ProtocolError;
use crate::types::{
    HeuristicResult, Maze, MazeDimensions, MazeSize, Position, ResultSet, SolutionOverlay,
};

pub const GENERATE_PATH: &str = "/generate_maze";
pub const SOLVE_PATH: &str = "/solve_maze";

// ============= Generate =============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple_paths: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wall_removal_probability: Option<f64>,
}

impl GenerateRequest {
    pub fn new(size: MazeSize) -> Self {
        Self {
            size: size.get(),
            multiple_paths: None,
            wall_removal_probability: None,
        }
    }

    pub fn with_multiple_paths(mut self, enabled: bool) -> Self {
        self.multiple_paths = Some(enabled);
        self
    }

    pub fn with_wall_removal_probability(mut self, probability: f64) -> Self {
        self.wall_removal_probability = Some(probability.clamp(0.0, 1.0));
        self
    }

    pub fn with_options(self, options: GenerateOptions) -> Self {
        let request = match options.multiple_paths {
            Some(enabled) => self.with_multiple_paths(enabled),
            None => self,
        };
        match options.wall_removal_probability {
            Some(p) => request.with_wall_removal_probability(p),
            None => request,
        }
    }
}

/// Generator knobs that stay fixed across a session.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerateOptions {
    pub multiple_paths: Option<bool>,
    pub wall_removal_probability: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub maze: Vec<Vec<i32>>,
    pub start: Position,
    pub end: Position,
}

/// A generate response that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMaze {
    pub maze: Maze,
    pub start: Position,
    pub end: Position,
}

impl GenerateResponse {
    /// Check the response against the size that was asked for.
    pub fn validate(self, requested: MazeSize) -> Result<GeneratedMaze, ProtocolError> {
        let maze = Maze::new(self.maze)?;
        let dims = maze.dimensions();
        let size = requested.get() as usize;
        if dims.rows != size || dims.cols != size {
            return Err(ProtocolError::SizeMismatch {
                size: requested.get(),
                actual: dims,
            });
        }
        check_in_bounds("start", self.start, dims)?;
        check_in_bounds("end", self.end, dims)?;
        Ok(GeneratedMaze {
            maze,
            start: self.start,
            end: self.end,
        })
    }
}

fn check_in_bounds(
    which: &'static str,
    position: Position,
    dims: MazeDimensions,
) -> Result<(), ProtocolError> {
    if dims.contains(position) {
        Ok(())
    } else {
        Err(ProtocolError::PositionOutOfBounds {
            which,
            position,
            dims,
        })
    }
}

// ============= Solve =============

#[derive(Debug, Clone, Serialize)]
pub struct SolveRequest<'a> {
    pub maze: &'a Maze,
    pub start: Position,
    pub end: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicPayload {
    pub time: f64,
    pub solved_maze: Vec<Vec<i32>>,
    /// Server-side ordering hint. The client imposes its own canonical order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<u32>,
}

pub type SolveResponse = HashMap<String, HeuristicPayload>;

/// Turn a solve response into a [`ResultSet`] for a maze of `dims`.
pub fn validate_solve(
    response: SolveResponse,
    dims: MazeDimensions,
) -> Result<ResultSet, ProtocolError> {
    if response.is_empty() {
        return Err(ProtocolError::EmptyResultSet);
    }

    let mut results = ResultSet::with_capacity(response.len());
    for (name, payload) in response {
        if !payload.time.is_finite() || payload.time < 0.0 {
            return Err(ProtocolError::InvalidTime {
                name,
                time: payload.time,
            });
        }
        let overlay = SolutionOverlay::new(payload.solved_maze)?;
        if overlay.dimensions() != dims {
            return Err(ProtocolError::OverlayMismatch {
                name,
                expected: dims,
                actual: overlay.dimensions(),
            });
        }
        results.insert(
            name,
            HeuristicResult {
                time: payload.time,
                overlay,
            },
        );
    }
    Ok(results)
}

// ============= Decoding =============

pub fn decode_generate(body: &[u8]) -> Result<GenerateResponse, ProtocolError> {
    serde_json::from_slice(body).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

pub fn decode_solve(body: &[u8]) -> Result<SolveResponse, ProtocolError> {
    serde_json::from_slice(body).map_err(|e| ProtocolError::Malformed(e.to_string()))
}
