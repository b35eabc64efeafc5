use crate::grids::Position;
use crate::playback::PlaybackState;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Board construction and edit failures.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Zero rows or columns; never recoverable.
    #[error("invalid grid dimensions {rows}x{columns}")]
    InvalidDimensions { rows: usize, columns: usize },

    #[error("position {0:?} is outside the grid")]
    OutOfBounds(Position),

    /// Start and goal cells must stay plain.
    #[error("position {0:?} holds the start or goal marker")]
    Protected(Position),

    #[error("position {0:?} is blocked")]
    Blocked(Position),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PlaybackError {
    #[error("`{operation}` is not allowed while {state:?}")]
    InvalidOperation {
        operation: &'static str,
        state: PlaybackState,
    },
}

impl PlaybackError {
    pub fn invalid(operation: &'static str, state: PlaybackState) -> Self {
        Self::InvalidOperation { operation, state }
    }
}

/// Failures on the request/response boundary with the solver service.
#[derive(thiserror::Error, Debug)]
pub enum SolverError {
    #[error("solver unavailable: {0}")]
    Unavailable(String),

    #[error("solver returned HTTP status {0}")]
    Status(u16),

    #[error("could not decode solver response: {0}")]
    Decode(String),

    #[error("invalid trace: {0}")]
    InvalidTrace(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    Parse(#[from] toml::de::Error),
}
