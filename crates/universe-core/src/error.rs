//! Pipeline error type.

use thiserror::Error;
use universe_ingest::IngestError;
use universe_model::CollectionId;
use universe_store::StoreError;
use universe_transform::TransformError;

use crate::request::ValidationError;

/// Errors from [`prepare`](crate::prepare) and
/// [`create_universe`](crate::create_universe).
///
/// Failures after the collection was created carry its id, how many records
/// reached the store, and whether the collection was deleted again, so a
/// caller can tell a clean failure from a partial write.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// The store refused to create the collection; nothing was written.
    #[error("failed to create collection: {source}")]
    CreateCollection {
        #[source]
        source: StoreError,
    },

    /// The source could not be reopened for the record pass.
    #[error("failed to reopen source for collection {collection_id}: {source}")]
    Reread {
        collection_id: CollectionId,
        rolled_back: bool,
        #[source]
        source: IngestError,
    },

    /// A row failed to transform; no records were inserted.
    #[error("failed to transform records for collection {collection_id}: {source}")]
    Transform {
        collection_id: CollectionId,
        rolled_back: bool,
        #[source]
        source: TransformError,
    },

    /// The source differs from the one that was inspected.
    #[error(
        "source changed since inspection for collection {collection_id}: expected {expected_records} records, found {actual_records}"
    )]
    SourceChanged {
        collection_id: CollectionId,
        rolled_back: bool,
        expected_records: usize,
        actual_records: usize,
        expected_fingerprint: String,
        actual_fingerprint: String,
    },

    /// A record batch was rejected after `inserted` records were stored.
    #[error("failed to insert records into collection {collection_id} after {inserted} records: {source}")]
    Insert {
        collection_id: CollectionId,
        inserted: usize,
        rolled_back: bool,
        #[source]
        source: StoreError,
    },
}

impl PipelineError {
    /// Collection created before the failure, if any.
    pub fn collection_id(&self) -> Option<CollectionId> {
        match self {
            Self::Validation(_) | Self::Ingest(_) | Self::CreateCollection { .. } => None,
            Self::Reread { collection_id, .. }
            | Self::Transform { collection_id, .. }
            | Self::SourceChanged { collection_id, .. }
            | Self::Insert { collection_id, .. } => Some(*collection_id),
        }
    }

    /// Records stored before the failure.
    pub fn inserted(&self) -> usize {
        match self {
            Self::Insert { inserted, .. } => *inserted,
            _ => 0,
        }
    }

    /// Whether the created collection was deleted again.
    pub fn rolled_back(&self) -> bool {
        match self {
            Self::Reread { rolled_back, .. }
            | Self::Transform { rolled_back, .. }
            | Self::SourceChanged { rolled_back, .. }
            | Self::Insert { rolled_back, .. } => *rolled_back,
            _ => false,
        }
    }

    /// True when the failure left a collection behind in the store.
    pub fn left_collection(&self) -> bool {
        self.collection_id().is_some() && !self.rolled_back()
    }
}
