//! Universe creation pipeline with explicit stages.
//!
//! [`prepare`] runs before the user reviews the mapping:
//! 1. **Validate**: required fields and the size ceiling
//! 2. **Inspect**: headers, record count, distinct values, fingerprint
//! 3. **Map**: auto-map headers onto the taxonomy
//!
//! [`create_universe`] runs after review:
//! 1. **Create**: store the collection and obtain its id
//! 2. **Transform**: re-stream the source into target records
//! 3. **Verify**: the source still matches what was inspected
//! 4. **Insert**: write records in batches
//!
//! Create and insert are separate store calls. Under [`CommitMode::Legacy`]
//! a failure after step 1 leaves the collection (and any inserted batches)
//! in place; [`CommitMode::Compensating`] deletes it again.

use std::time::Instant;

use tracing::{debug, error, info, info_span, warn};
use universe_ingest::{
    IngestOptions, IngestSummary, inspect_path, inspect_path_with_progress, open_rows,
};
use universe_map::MappingState;
use universe_model::{Collection, CollectionId, NewCollection, Taxonomy};
use universe_store::CollectionStore;
use universe_transform::RecordTransformer;

use crate::error::PipelineError;
use crate::request::{UniverseRequest, UploadLimits, ValidatedRequest};

/// Default number of records per insert call.
pub const DEFAULT_INSERT_BATCH_SIZE: usize = 500;

/// What to do with a created collection when a later stage fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitMode {
    /// Leave the collection and any inserted records in place.
    #[default]
    Legacy,
    /// Delete the collection again.
    Compensating,
}

/// Options shared by both pipeline halves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub ingest: IngestOptions,
    pub limits: UploadLimits,
    pub commit_mode: CommitMode,
    pub insert_batch_size: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            ingest: IngestOptions::default().with_values(true),
            limits: UploadLimits::default(),
            commit_mode: CommitMode::Legacy,
            insert_batch_size: DEFAULT_INSERT_BATCH_SIZE,
        }
    }
}

/// An inspected upload awaiting mapping review.
#[derive(Debug, Clone)]
pub struct PreparedUpload {
    pub request: ValidatedRequest,
    pub summary: IngestSummary,
    /// Editable mapping, seeded with auto-mapper suggestions.
    pub state: MappingState,
}

/// Result of a successful create.
#[derive(Debug, Clone)]
pub struct CreateOutcome {
    pub collection: Collection,
    pub inserted: usize,
    pub batches: usize,
}

// ============================================================================
// Prepare
// ============================================================================

/// Validates, inspects and auto-maps an upload.
pub fn prepare(
    request: &UniverseRequest,
    taxonomy: Taxonomy,
    options: &PipelineOptions,
) -> Result<PreparedUpload, PipelineError> {
    let request = request.validate(&options.limits)?;
    let summary = inspect_path(&request.source, &options.ingest)?;
    Ok(finish_prepare(request, summary, taxonomy))
}

/// Like [`prepare`], reporting bytes consumed during inspection.
pub fn prepare_with_progress(
    request: &UniverseRequest,
    taxonomy: Taxonomy,
    options: &PipelineOptions,
    progress: impl FnMut(u64),
) -> Result<PreparedUpload, PipelineError> {
    let request = request.validate(&options.limits)?;
    let summary = inspect_path_with_progress(&request.source, &options.ingest, progress)?;
    Ok(finish_prepare(request, summary, taxonomy))
}

fn finish_prepare(
    request: ValidatedRequest,
    summary: IngestSummary,
    taxonomy: Taxonomy,
) -> PreparedUpload {
    let span = info_span!("prepare", name = %request.name, source = %request.source.display());
    let _guard = span.enter();

    let state = MappingState::from_suggestions(taxonomy, summary.headers.clone());
    let mapping_summary = state.summary();
    info!(
        records = summary.record_count,
        columns = summary.headers.len(),
        mapped = mapping_summary.mapped,
        unmapped = mapping_summary.unmapped_headers,
        "prepared upload"
    );

    PreparedUpload {
        request,
        summary,
        state,
    }
}

// ============================================================================
// Create
// ============================================================================

/// Creates the collection and inserts its records.
pub fn create_universe<S>(
    store: &mut S,
    prepared: &PreparedUpload,
    options: &PipelineOptions,
) -> Result<CreateOutcome, PipelineError>
where
    S: CollectionStore + ?Sized,
{
    create_universe_with_progress(store, prepared, options, |_, _| {})
}

/// Like [`create_universe`], calling `on_batch(inserted, total)` after each
/// stored batch.
pub fn create_universe_with_progress<S>(
    store: &mut S,
    prepared: &PreparedUpload,
    options: &PipelineOptions,
    mut on_batch: impl FnMut(usize, usize),
) -> Result<CreateOutcome, PipelineError>
where
    S: CollectionStore + ?Sized,
{
    let span = info_span!("create", name = %prepared.request.name, mode = ?options.commit_mode);
    let _guard = span.enter();
    let start = Instant::now();

    let mapping = prepared.state.mapping();
    let conflicts = mapping.conflicts();
    if !conflicts.is_empty() {
        warn!(
            fields = ?conflicts.keys().collect::<Vec<_>>(),
            "creating universe with fields mapped from several headers"
        );
    }

    // Stage 1: create
    let collection = store
        .create_collection(NewCollection {
            name: prepared.request.name.clone(),
            kind: prepared.request.kind.clone(),
            record_count: prepared.summary.record_count,
            mappings: mapping.field_map(),
            source_fingerprint: Some(prepared.summary.fingerprint.clone()),
        })
        .map_err(|source| PipelineError::CreateCollection { source })?;
    let id = collection.id;
    info!(collection_id = %id, "created collection");

    // Stage 2: transform
    let mut rows = match open_rows(&prepared.request.source, &options.ingest) {
        Ok(rows) => rows,
        Err(source) => {
            let rolled_back = settle(store, options.commit_mode, id, 0);
            return Err(PipelineError::Reread {
                collection_id: id,
                rolled_back,
                source,
            });
        }
    };
    let transformer = RecordTransformer::new(mapping, id);
    let records = match transformer.transform_rows(rows.by_ref()) {
        Ok(records) => records,
        Err(source) => {
            let rolled_back = settle(store, options.commit_mode, id, 0);
            return Err(PipelineError::Transform {
                collection_id: id,
                rolled_back,
                source,
            });
        }
    };

    // Stage 3: verify
    let digest = rows.digest();
    if records.len() != prepared.summary.record_count
        || digest.fingerprint != prepared.summary.fingerprint
    {
        let rolled_back = settle(store, options.commit_mode, id, 0);
        return Err(PipelineError::SourceChanged {
            collection_id: id,
            rolled_back,
            expected_records: prepared.summary.record_count,
            actual_records: records.len(),
            expected_fingerprint: prepared.summary.fingerprint.clone(),
            actual_fingerprint: digest.fingerprint,
        });
    }
    debug!(records = records.len(), "transformed records");

    // Stage 4: insert
    let batch_size = options.insert_batch_size.max(1);
    let total = records.len();
    let mut inserted = 0;
    let mut batches = 0;
    for batch in records.chunks(batch_size) {
        match store.insert_records(id, batch) {
            Ok(count) => {
                inserted += count;
                batches += 1;
                on_batch(inserted, total);
            }
            Err(source) => {
                let rolled_back = settle(store, options.commit_mode, id, inserted);
                return Err(PipelineError::Insert {
                    collection_id: id,
                    inserted,
                    rolled_back,
                    source,
                });
            }
        }
    }

    info!(
        collection_id = %id,
        records = inserted,
        batches,
        duration_ms = start.elapsed().as_millis(),
        "universe created"
    );
    Ok(CreateOutcome {
        collection,
        inserted,
        batches,
    })
}

/// Applies the commit mode after a failure; returns whether the collection
/// was deleted.
fn settle<S>(store: &mut S, mode: CommitMode, id: CollectionId, inserted: usize) -> bool
where
    S: CollectionStore + ?Sized,
{
    match mode {
        CommitMode::Legacy => {
            warn!(collection_id = %id, inserted, "collection left in place after failure");
            false
        }
        CommitMode::Compensating => match store.delete_collection(id) {
            Ok(()) => {
                info!(collection_id = %id, inserted, "rolled back collection");
                true
            }
            Err(err) => {
                error!(collection_id = %id, error = %err, "compensating delete failed");
                false
            }
        },
    }
}
