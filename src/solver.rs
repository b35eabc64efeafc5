use crate::error::SolverError;
use crate::grids::terrain_grid::TerrainGrid;
use crate::grids::Position;
use crate::trace::{Algorithm, Scores, SearchDirection, SearchTrace, TraceEvent};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SOLVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolveRequest {
    pub grid: Vec<Vec<u8>>,
    pub start: Position,
    pub end: Position,
    pub algorithm: Algorithm,
}

impl SolveRequest {
    pub fn new(grid: &TerrainGrid, algorithm: Algorithm) -> Self {
        Self {
            grid: grid.to_rows(),
            start: grid.start(),
            end: grid.goal(),
            algorithm,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct VisitedNode {
    pos: Position,
    g: f64,
    #[serde(default)]
    h: Option<f64>,
    #[serde(default)]
    f: Option<f64>,
    #[serde(default)]
    dir: Option<SearchDirection>,
}

impl VisitedNode {
    fn into_event(self, algorithm: Algorithm) -> Result<TraceEvent, SolverError> {
        let position = self.pos;
        let g = self.g;

        match (self.h, self.f, self.dir) {
            (Some(h), Some(f), Some(direction)) => Ok(TraceEvent::Bidirectional {
                position,
                scores: Scores { g, h, f },
                direction,
            }),
            (_, _, Some(_)) => Err(SolverError::InvalidTrace(format!(
                "node {:?} has a direction but no scores",
                position
            ))),
            (Some(h), Some(f), None) if algorithm != Algorithm::Bfs => Ok(TraceEvent::Informed {
                position,
                scores: Scores { g, h, f },
            }),
            (_, _, None) if algorithm != Algorithm::Bfs => Err(SolverError::InvalidTrace(format!(
                "node {:?} is missing h or f for {}",
                position, algorithm
            ))),
            _ => Ok(TraceEvent::Uninformed { position, g }),
        }
    }
}

/// Body of a `/solve` reply.
#[derive(Debug, Clone, Deserialize)]
pub struct SolveResponse {
    visited_nodes: Vec<VisitedNode>,
    path: Vec<Position>,
    #[serde(default)]
    execution_time_ms: f64,
    #[serde(default)]
    path_cost: Option<f64>,
}

impl SolveResponse {
    pub fn from_json(body: &str) -> Result<Self, SolverError> {
        serde_json::from_str(body).map_err(|e| SolverError::Decode(e.to_string()))
    }

    pub fn into_trace(self, request: &SolveRequest) -> Result<SearchTrace, SolverError> {
        let node_count = self.visited_nodes.len();
        let events = self
            .visited_nodes
            .into_iter()
            .map(|node| node.into_event(request.algorithm))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchTrace {
            algorithm: request.algorithm,
            start: request.start,
            goal: request.end,
            events,
            path: self.path,
            total_cost: self.path_cost,
            node_count,
            elapsed_ms: self.execution_time_ms,
        })
    }
}

pub trait Solver {
    fn solve(&self, request: &SolveRequest) -> Result<SearchTrace, SolverError>;
}

/// Talks to the search service over HTTP.
pub struct HttpSolver {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpSolver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, SolverError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SolverError::Unavailable(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/solve", self.base_url.trim_end_matches('/'))
    }
}

impl Solver for HttpSolver {
    fn solve(&self, request: &SolveRequest) -> Result<SearchTrace, SolverError> {
        let url = self.endpoint();
        log::info!("Requesting {} from {}", request.algorithm.display_name(), url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .map_err(|e| SolverError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SolverError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .map_err(|e| SolverError::Unavailable(e.to_string()))?;

        SolveResponse::from_json(&body)?.into_trace(request)
    }
}

/// Replays a stored `/solve` reply, whatever the request.
#[derive(Debug, Clone)]
pub struct RecordedSolver {
    response: SolveResponse,
}

impl RecordedSolver {
    pub fn from_json(body: &str) -> Result<Self, SolverError> {
        Ok(Self {
            response: SolveResponse::from_json(body)?,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, SolverError> {
        let body = std::fs::read_to_string(path)
            .map_err(|e| SolverError::Unavailable(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&body)
    }
}

impl Solver for RecordedSolver {
    fn solve(&self, request: &SolveRequest) -> Result<SearchTrace, SolverError> {
        self.response.clone().into_trace(request)
    }
}
