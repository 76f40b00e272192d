//! Streaming ingestion of uploaded tabular sources.
//!
//! A source is delimited text whose first record is the header row. It is
//! read record by record, so memory stays proportional to the largest row
//! plus any distinct values being collected.
//!
//! - [`inspect_path`] / [`inspect_reader`]: headers, record count, optional
//!   distinct values, and a SHA-256 fingerprint in one pass.
//! - [`RowReader`] / [`open_rows`]: re-stream the same source as
//!   [`RawRow`](universe_model::RawRow)s.

#![deny(unsafe_code)]

mod error;
mod inspect;
mod reader;
mod source;

// === Error Types ===
pub use error::{IngestError, Result};

// === Inspection ===
pub use inspect::{
    IngestSummary, inspect_path, inspect_path_with_progress, inspect_reader,
    inspect_reader_with_progress,
};

// === Row Streaming ===
pub use reader::{IngestOptions, RowReader, open_rows};
pub use source::SourceDigest;
