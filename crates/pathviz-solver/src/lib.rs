//! Pathfinding solvers for the pathviz grid.
//!
//! A [`Solver`] answers a [`SolveRequest`] (a grid snapshot, a heuristic and
//! whether to record animation steps) with a [`SolveResponse`]:
//!
//! - [`HttpSolver`] posts the request to a remote pathfinding service
//! - [`LocalSolver`] runs A* in-process ([`astar`])
//!
//! Solvers block; the application runs them off the UI thread.

mod astar;
mod distance;
mod error;
mod http;
mod wire;

pub use astar::{LocalSolver, astar};
pub use distance::{euclidean, manhattan, path_length};
pub use error::{Result, SolverError};
pub use http::{HttpSolver, PATHFIND_PATH};
pub use wire::{Heuristic, SolveRequest, SolveResponse};

/// Something that can answer a search request.
pub trait Solver: Send + Sync {
    fn solve(&self, req: &SolveRequest) -> Result<SolveResponse>;
}

impl<S: Solver + ?Sized> Solver for std::sync::Arc<S> {
    fn solve(&self, req: &SolveRequest) -> Result<SolveResponse> {
        (**self).solve(req)
    }
}
