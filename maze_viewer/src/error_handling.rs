// error_handling.rs - Error taxonomy for the viewer session

use thiserror::Error;

use crate::types::{MazeDimensions, Position};

/// The request could not be completed.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP client setup failed: {0}")]
    ClientSetup(String),

    #[error("request to {endpoint} failed: {message}")]
    Request { endpoint: String, message: String },

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },
}

/// A response arrived but does not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProtocolError {
    #[error("malformed response body: {0}")]
    Malformed(String),

    #[error("grid has no cells")]
    EmptyGrid,

    #[error("grid row {row} has {actual} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("maze cell ({row}, {col}) has code {value}, expected 0 or 1")]
    InvalidCell { row: usize, col: usize, value: i32 },

    #[error("maze is {actual} but {size}x{size} was requested")]
    SizeMismatch { size: u32, actual: MazeDimensions },

    #[error("{which} position {position} lies outside the {dims} maze")]
    PositionOutOfBounds {
        which: &'static str,
        position: Position,
        dims: MazeDimensions,
    },

    #[error("solve response contains no heuristic results")]
    EmptyResultSet,

    #[error("overlay for '{name}' is {actual}, maze is {expected}")]
    OverlayMismatch {
        name: String,
        expected: MazeDimensions,
        actual: MazeDimensions,
    },

    #[error("heuristic '{name}' reported invalid time {time}")]
    InvalidTime { name: String, time: f64 },
}

/// An operation was invoked in a state that does not support it. Correct
/// control gating makes these unreachable; seeing one is a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PreconditionViolation {
    #[error("solve requires a generated maze")]
    NoMaze,

    #[error("selecting a heuristic requires solve results")]
    NoResults,

    #[error("heuristic '{0}' is not part of the current results")]
    UnknownHeuristic(String),

    #[error("{0} control is disabled")]
    ControlDisabled(&'static str),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("precondition violated: {0}")]
    Precondition(#[from] PreconditionViolation),
}

impl SessionError {
    /// Transport and protocol failures are shown to the user; precondition
    /// violations are programming errors.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, SessionError::Precondition(_))
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        let transport: SessionError = TransportError::Timeout {
            endpoint: "/solve_maze".into(),
        }
        .into();
        let protocol: SessionError = ProtocolError::EmptyResultSet.into();
        let precondition: SessionError = PreconditionViolation::NoMaze.into();

        assert!(transport.is_user_facing());
        assert!(protocol.is_user_facing());
        assert!(!precondition.is_user_facing());
    }

    #[test]
    fn test_messages_name_the_problem() {
        let err = ProtocolError::PositionOutOfBounds {
            which: "end",
            position: Position::new(9, 3),
            dims: MazeDimensions { rows: 5, cols: 5 },
        };
        assert_eq!(err.to_string(), "end position (9, 3) lies outside the 5x5 maze");

        let err = ProtocolError::SizeMismatch {
            size: 7,
            actual: MazeDimensions { rows: 5, cols: 7 },
        };
        assert_eq!(err.to_string(), "maze is 5x7 but 7x7 was requested");
    }
}
