use crate::error::SolverError;
use crate::grids::{Dimensions, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "bfs")]
    Bfs,
    #[serde(rename = "astar")]
    AStar,
    #[serde(rename = "dijkstra")]
    Dijkstra,
    #[serde(rename = "gbfs")]
    Gbfs,
    #[serde(rename = "bidirectional_astar")]
    BidirectionalAStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Bfs,
        Algorithm::AStar,
        Algorithm::Dijkstra,
        Algorithm::Gbfs,
        Algorithm::BidirectionalAStar,
    ];

    /// Identifier used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::AStar => "astar",
            Algorithm::Dijkstra => "dijkstra",
            Algorithm::Gbfs => "gbfs",
            Algorithm::BidirectionalAStar => "bidirectional_astar",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Algorithm::Bfs => "Breadth-First Search",
            Algorithm::AStar => "A* Search",
            Algorithm::Dijkstra => "Dijkstra's Algorithm",
            Algorithm::Gbfs => "Greedy Best-First Search",
            Algorithm::BidirectionalAStar => "Bidirectional A*",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Algorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.key() == s)
            .ok_or_else(|| format!("unknown algorithm `{}`", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchDirection {
    #[serde(rename = "fwd")]
    Forward,
    #[serde(rename = "bwd")]
    Backward,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scores {
    pub g: f64,
    pub h: f64,
    pub f: f64,
}

/// One visited node. The variant depends on what the algorithm computes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceEvent {
    /// Breadth-first: `g` counts steps, or holds the path cost on the goal.
    Uninformed { position: Position, g: f64 },
    Informed { position: Position, scores: Scores },
    Bidirectional {
        position: Position,
        scores: Scores,
        direction: SearchDirection,
    },
}

impl TraceEvent {
    pub fn position(&self) -> Position {
        match *self {
            TraceEvent::Uninformed { position, .. }
            | TraceEvent::Informed { position, .. }
            | TraceEvent::Bidirectional { position, .. } => position,
        }
    }

    pub fn g(&self) -> f64 {
        match *self {
            TraceEvent::Uninformed { g, .. } => g,
            TraceEvent::Informed { scores, .. } | TraceEvent::Bidirectional { scores, .. } => {
                scores.g
            }
        }
    }

    pub fn scores(&self) -> Option<Scores> {
        match *self {
            TraceEvent::Uninformed { .. } => None,
            TraceEvent::Informed { scores, .. } | TraceEvent::Bidirectional { scores, .. } => {
                Some(scores)
            }
        }
    }

    pub fn direction(&self) -> Option<SearchDirection> {
        match *self {
            TraceEvent::Bidirectional { direction, .. } => Some(direction),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchTrace {
    pub algorithm: Algorithm,
    pub start: Position,
    pub goal: Position,
    pub events: Vec<TraceEvent>,
    pub path: Vec<Position>,
    pub total_cost: Option<f64>,
    pub node_count: usize,
    pub elapsed_ms: f64,
}

impl SearchTrace {
    pub fn path_found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Every event and path position must sit inside `dims`.
    pub fn validate(&self, dims: Dimensions) -> Result<(), SolverError> {
        let stray = self
            .events
            .iter()
            .map(TraceEvent::position)
            .chain(self.path.iter().copied())
            .find(|position| !dims.contains(*position));

        match stray {
            Some(position) => Err(SolverError::InvalidTrace(format!(
                "position {:?} is outside the {}x{} grid",
                position, dims.rows, dims.columns
            ))),
            None => Ok(()),
        }
    }

    fn g_at(&self, position: Position) -> Option<f64> {
        self.events
            .iter()
            .find(|event| event.position() == position)
            .map(TraceEvent::g)
    }

    /// Explicit total if the solver sent one, else `g` where the search met
    /// the goal, else `g` at the last path cell. Absent when none of those
    /// exist or no path was found.
    pub fn path_cost(&self) -> Option<f64> {
        if !self.path_found() {
            return None;
        }

        self.total_cost
            .or_else(|| self.g_at(self.goal))
            .or_else(|| self.path.last().and_then(|last| self.g_at(*last)))
    }

    pub fn summary(&self) -> Summary {
        Summary {
            algorithm: self.algorithm,
            path_found: self.path_found(),
            cost: self.path_cost(),
            path_length: self.path.len(),
            nodes_explored: self.node_count,
            elapsed_ms: self.elapsed_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub algorithm: Algorithm,
    pub path_found: bool,
    pub cost: Option<f64>,
    pub path_length: usize,
    pub nodes_explored: usize,
    pub elapsed_ms: f64,
}

/// Whole numbers print without a fraction.
pub fn format_score(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{:.0}", value)
    } else {
        format!("{:.2}", value)
    }
}
