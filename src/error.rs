//! Crate-level error type and `Result` alias for stable, structured error handling.
//! Converts underlying I/O, JSON, and engine errors, and provides semantic variants
//! for input acquisition and default extern loading failures.
use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load default externs from {}: {source}", dir.display())]
    Externs {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a read failure, naming the input that failed.
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }
}
