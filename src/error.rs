use std::fmt;

use thiserror::Error;

use crate::grid::Position;

/// Convenient result alias for the gridpath library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// A (row, col) pair outside the grid was addressed.
    #[error("cell ({row}, {col}) is outside the {rows}x{rows} grid")]
    OutOfBounds { row: usize, col: usize, rows: usize },

    /// Raised when creating a grid without any rows.
    #[error("grid must have at least one row, got {rows}")]
    InvalidGridSize { rows: usize },

    /// Raised before a search starts when its endpoints cannot be searched.
    #[error("invalid search request: {0}")]
    InvalidSearchRequest(RequestProblem),

    /// Raised when a search is triggered before both endpoints are placed.
    #[error("no {which} cell has been placed")]
    MissingEndpoint { which: Endpoint },

    /// An interactive command could not be understood.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// Wrapper for IO errors raised while rendering.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why a search request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestProblem {
    #[error("start and end are the same cell {0}")]
    SameEndpoints(Position),
    #[error("start cell {0} is blocked")]
    BlockedStart(Position),
    #[error("end cell {0} is blocked")]
    BlockedEnd(Position),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => f.write_str("start"),
            Endpoint::End => f.write_str("end"),
        }
    }
}
