//! Request and response types exchanged with a solver.
//!
//! The JSON shapes are those of the pathfinding service's `/api/pathfind`
//! endpoint.

use std::fmt;
use std::str::FromStr;

use pathviz_core::Point;
use pathviz_grid::{GridModel, Step, null_as_empty};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, SolverError};

// ---------------------------------------------------------------------------
// Heuristic
// ---------------------------------------------------------------------------

/// Distance estimate used by A*.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
}

impl Heuristic {
    pub const ALL: [Heuristic; 2] = [Heuristic::Manhattan, Heuristic::Euclidean];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manhattan => "manhattan",
            Self::Euclidean => "euclidean",
        }
    }

    /// Display label, e.g. for the stats panel.
    pub fn label(self) -> &'static str {
        match self {
            Self::Manhattan => "Manhattan",
            Self::Euclidean => "Euclidean",
        }
    }

    /// The next heuristic, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Manhattan => Self::Euclidean,
            Self::Euclidean => Self::Manhattan,
        }
    }

    /// Lenient lookup: anything but `"euclidean"` is Manhattan.
    pub fn from_id(id: &str) -> Self {
        if id.eq_ignore_ascii_case("euclidean") {
            Self::Euclidean
        } else {
            Self::Manhattan
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Heuristic {
    type Err = SolverError;

    /// Strict parse, for user input.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|h| h.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| SolverError::InvalidRequest(format!("unknown heuristic {s:?}")))
    }
}

impl<'de> Deserialize<'de> for Heuristic {
    fn deserialize<D: Deserializer<'de>>(d: D) -> std::result::Result<Self, D::Error> {
        let id = String::deserialize(d)?;
        Ok(Self::from_id(&id))
    }
}

// ---------------------------------------------------------------------------
// SolveRequest
// ---------------------------------------------------------------------------

/// A search request: a grid snapshot plus options.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SolveRequest {
    pub grid: GridModel,
    pub heuristic: Heuristic,
    /// Whether to record per-expansion steps.
    pub animate: bool,
}

impl SolveRequest {
    /// Snapshot `grid` into a request. Fails when the request could not be
    /// answered, most notably when start and end coincide.
    pub fn new(grid: &GridModel, heuristic: Heuristic, animate: bool) -> Result<Self> {
        let req = Self {
            grid: grid.clone(),
            heuristic,
            animate,
        };
        req.validate()?;
        Ok(req)
    }

    /// The checks the pathfinding service applies before searching.
    pub fn validate(&self) -> Result<()> {
        let grid = &self.grid;
        let invalid = |msg: &str| Err(SolverError::InvalidRequest(msg.to_string()));
        if grid.width() <= 0 || grid.height() <= 0 {
            return invalid("invalid grid dimensions");
        }
        if !grid.contains(grid.start()) {
            return invalid("invalid start point");
        }
        if !grid.contains(grid.end()) {
            return invalid("invalid end point");
        }
        if grid.start() == grid.end() {
            return invalid("start and end points cannot be the same");
        }
        grid.check_shape()
            .map_err(|e| SolverError::InvalidRequest(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// SolveResponse
// ---------------------------------------------------------------------------

/// A search result. `success == false` means no path exists; it is not an
/// error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SolveResponse {
    pub success: bool,
    #[serde(default)]
    pub path_length: f64,
    #[serde(default)]
    pub nodes_explored: usize,
    #[serde(default, deserialize_with = "null_as_empty", skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<Step>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: Vec<Point>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explored_nodes: Vec<Point>,
}

/// Body of a non-success HTTP response.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
