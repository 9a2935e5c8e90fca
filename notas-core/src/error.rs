//! Error types for Notas

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Notas operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Notas
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The document directory exists but could not be enumerated
    #[error("Cannot read directory {}: {source}", path.display())]
    UnreadableDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Server error
    #[error("Server error: {0}")]
    Server(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
