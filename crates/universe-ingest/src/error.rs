//! Error types for source ingestion.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading an uploaded source.
///
/// Every variant aborts the whole operation; no partial summary is returned.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to open or read the source.
    #[error("failed to read source: {source}")]
    Io {
        #[source]
        source: std::io::Error,
    },

    // === Parsing Errors ===
    /// The source has no header row, or the header row is blank.
    #[error("source has no header row")]
    MissingHeader,

    /// A row could not be decoded.
    #[error("parse error on line {line}: {message}")]
    Parse { line: u64, message: String },

    /// The source starts with a byte order mark for an encoding other than UTF-8.
    #[error("unsupported encoding: {encoding}")]
    UnsupportedEncoding { encoding: &'static str },
}

impl From<std::io::Error> for IngestError {
    fn from(source: std::io::Error) -> Self {
        Self::Io { source }
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map_or(0, csv::Position::line);
        match err.into_kind() {
            csv::ErrorKind::Io(source) => Self::Io { source },
            csv::ErrorKind::Utf8 { err, .. } => Self::Parse {
                line,
                message: format!("invalid UTF-8 in field {}", err.field() + 1),
            },
            other => Self::Parse {
                line,
                message: format!("{other:?}"),
            },
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
