//! Error types for storage operations.

use std::path::PathBuf;

use thiserror::Error;
use universe_model::CollectionId;

/// Errors returned by a [`CollectionStore`](crate::CollectionStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused the write.
    #[error("store rejected the write: {message}")]
    Rejected { message: String },

    /// No collection with this id.
    #[error("collection {id} not found")]
    NotFound { id: CollectionId },

    /// Filesystem failure.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Stored data could not be encoded or decoded.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            source,
        }
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
