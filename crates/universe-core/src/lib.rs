//! Universe builder core: upload validation and the create pipeline.

#![deny(unsafe_code)]

mod error;
pub mod pipeline;
pub mod request;

pub use error::PipelineError;
pub use pipeline::{
    CommitMode, CreateOutcome, DEFAULT_INSERT_BATCH_SIZE, PipelineOptions, PreparedUpload,
    create_universe, create_universe_with_progress, prepare, prepare_with_progress,
};
pub use request::{
    DEFAULT_MAX_FILE_SIZE, UniverseRequest, UploadLimits, ValidatedRequest, ValidationError,
};
