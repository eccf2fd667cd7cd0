use std::path::PathBuf;

use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Cannot read flag file {}: {source}", path.display())]
    Flagfile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid flag file {}: {source}", path.display())]
    FlagfileFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Compile(#[from] closurec::Error),
}
