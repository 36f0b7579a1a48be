//! Storage error types

use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// File read/write failed
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Persisted state could not be serialized or parsed
    #[error("Failed to encode or decode stored state: {0}")]
    Serde(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
