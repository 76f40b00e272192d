//! Record transformation.
//!
//! Turns [`RawRow`]s into [`TargetRecord`]s by looking cells up by header
//! name through a finalized [`Mapping`]. Target fields with no mapping are
//! absent from the record; headers with no mapping are dropped.

#![deny(unsafe_code)]

use thiserror::Error;
use universe_ingest::IngestError;
use universe_model::{CollectionId, Mapping, RawRow, TargetRecord};

/// Errors that abort a transformation batch.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Re-reading the source failed at the given data row (1-based).
    #[error("failed to read source row {row}: {source}")]
    Source {
        row: usize,
        #[source]
        source: IngestError,
    },
}

pub type Result<T> = std::result::Result<T, TransformError>;

/// Applies one mapping to rows of one file.
#[derive(Debug, Clone)]
pub struct RecordTransformer<'a> {
    mapping: &'a Mapping,
    collection_id: CollectionId,
}

impl<'a> RecordTransformer<'a> {
    pub fn new(mapping: &'a Mapping, collection_id: CollectionId) -> Self {
        Self {
            mapping,
            collection_id,
        }
    }

    pub fn collection_id(&self) -> CollectionId {
        self.collection_id
    }

    /// Transforms one row.
    ///
    /// Cells are visited in file order. When several headers map to the same
    /// field, the first one in the row wins. A mapped header missing from the
    /// row yields an absent value for its field.
    pub fn transform_row(&self, row: &RawRow) -> TargetRecord {
        let mut record = TargetRecord::new(self.collection_id);
        for (header, value) in row.cells() {
            if let Some(field) = self.mapping.target_for(header) {
                record
                    .values
                    .entry(field.to_string())
                    .or_insert_with(|| value.map(str::to_string));
            }
        }
        for entry in self.mapping.entries() {
            record.values.entry(entry.target_field.clone()).or_insert(None);
        }
        record
    }

    /// Transforms a fallible row stream.
    ///
    /// The first error aborts the batch and no records are returned.
    pub fn transform_rows<I>(&self, rows: I) -> Result<Vec<TargetRecord>>
    where
        I: IntoIterator<Item = std::result::Result<RawRow, IngestError>>,
    {
        let mut records = Vec::new();
        for (idx, row) in rows.into_iter().enumerate() {
            let row = row.map_err(|source| TransformError::Source {
                row: idx + 1,
                source,
            })?;
            records.push(self.transform_row(&row));
        }
        tracing::debug!(
            collection_id = %self.collection_id,
            records = records.len(),
            "transformed rows"
        );
        Ok(records)
    }
}
