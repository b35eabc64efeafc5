pub mod app;
pub mod config;
pub mod error;
pub mod generators;
pub mod grids;
pub mod playback;
pub mod renderer;
pub mod solver;
pub mod stats;
pub mod trace;

pub use error::{Error, Result};
