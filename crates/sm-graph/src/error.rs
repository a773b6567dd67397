//! Graph-subsystem error type.

use thiserror::Error;

use sm_core::CoreError;

/// Errors produced by `sm-graph` while building or loading a map.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("segment {index}: speed limit must be positive and finite (got {speed})")]
    InvalidSpeed { index: usize, speed: f64 },

    #[error("map parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GraphResult<T> = Result<T, GraphError>;
