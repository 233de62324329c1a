//! Error type for solver round trips.

use thiserror::Error;

/// Errors reported by a [`Solver`](crate::Solver).
#[derive(Debug, Error)]
pub enum SolverError {
    /// The request was rejected before reaching a solver, or by the solver's
    /// own validation.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status, with the server's `error` message when present.
    #[error("server error: {0}")]
    Server(String),

    #[error("malformed response: {0}")]
    Format(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SolverError>;
