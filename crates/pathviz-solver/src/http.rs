//! [`HttpSolver`]: client for a remote pathfinding service.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{Result, SolverError};
use crate::wire::{ErrorBody, SolveRequest, SolveResponse};
use crate::Solver;

/// Path of the search endpoint, relative to the service root.
pub const PATHFIND_PATH: &str = "/api/pathfind";

/// Posts requests to `{endpoint}/api/pathfind` and decodes the JSON reply.
#[derive(Clone, Debug)]
pub struct HttpSolver {
    client: Client,
    url: String,
}

impl HttpSolver {
    /// A client for the service at `endpoint` (e.g. `http://localhost:8080`).
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = endpoint.trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(SolverError::InvalidRequest("empty endpoint".to_string()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: format!("{endpoint}{PATHFIND_PATH}"),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Solver for HttpSolver {
    fn solve(&self, req: &SolveRequest) -> Result<SolveResponse> {
        req.validate()?;
        log::info!(
            "POST {} ({}x{}, {}, animate={})",
            self.url,
            req.grid.width(),
            req.grid.height(),
            req.heuristic,
            req.animate
        );
        let resp = self.client.post(&self.url).json(req).send()?;
        let status = resp.status();
        let body = resp.text()?;
        if !status.is_success() {
            let reason = serde_json::from_str::<ErrorBody>(&body)
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            log::warn!("solver replied {status}: {reason}");
            return Err(SolverError::Server(reason));
        }
        let decoded: SolveResponse = serde_json::from_str(&body)?;
        log::info!(
            "solver replied success={} explored={} steps={}",
            decoded.success,
            decoded.nodes_explored,
            decoded.steps.len()
        );
        Ok(decoded)
    }
}
