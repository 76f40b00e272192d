//! Error types for mapping edits.

use thiserror::Error;

/// Errors from mapping edit operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// Field value not present in the taxonomy.
    #[error("unknown target field: {field}")]
    UnknownField { field: String },
    /// Header not present in the source file.
    #[error("unknown source header: {header}")]
    UnknownHeader { header: String },
}

pub type Result<T> = std::result::Result<T, MappingError>;
