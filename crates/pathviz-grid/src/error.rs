//! Error type for grid edits.

use pathviz_core::Point;
use thiserror::Error;

use crate::model::GridSize;

/// Errors reported by [`GridModel`](crate::GridModel) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size {0} is outside {min}..={max}", min = GridSize::MIN, max = GridSize::MAX)]
    InvalidSize(i32),

    #[error("{0} is outside the grid")]
    OutOfBounds(Point),

    #[error("{0} already holds the other marker")]
    MarkerOverlap(Point),

    #[error("grid invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
