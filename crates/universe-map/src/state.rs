//! Mapping state for interactive editing.
//!
//! [`MappingState`] owns the headers of one uploaded file, the taxonomy they
//! are mapped against, and the current [`Mapping`]. Every edit keeps the
//! stored score consistent with the association it belongs to.

use std::collections::BTreeMap;

use serde::Serialize;
use universe_model::{Mapping, MappingEntry, Taxonomy};

use crate::engine::{MappingEngine, MappingResult};
use crate::error::{MappingError, Result};
use crate::score::{ConfidenceBand, score};

/// Editable mapping for one file.
#[derive(Debug, Clone)]
pub struct MappingState {
    taxonomy: Taxonomy,
    headers: Vec<String>,
    mapping: Mapping,
}

impl MappingState {
    /// Creates a state with no associations.
    pub fn new(taxonomy: Taxonomy, headers: Vec<String>) -> Self {
        Self {
            taxonomy,
            headers,
            mapping: Mapping::new(),
        }
    }

    /// Creates a state seeded with the auto-mapper's proposal.
    pub fn from_suggestions(taxonomy: Taxonomy, headers: Vec<String>) -> Self {
        let mut state = Self::new(taxonomy, headers);
        state.auto_map();
        state
    }

    /// Replaces the current mapping with a fresh auto-mapping.
    pub fn auto_map(&mut self) -> MappingResult {
        let result = MappingEngine::new(&self.taxonomy).suggest(&self.headers);
        self.mapping = result.mapping.clone();
        result
    }

    /// Sets or clears the association for a header.
    ///
    /// With a field, the score is recomputed from the header and that field's
    /// label. With `None`, the association and its score are removed. Returns
    /// the entry that was replaced or removed. On error nothing changes.
    pub fn set_mapping(&mut self, header: &str, field: Option<&str>) -> Result<Option<MappingEntry>> {
        if !self.headers.iter().any(|h| h == header) {
            return Err(MappingError::UnknownHeader {
                header: header.to_string(),
            });
        }

        let Some(value) = field else {
            let removed = self.mapping.remove(header);
            tracing::debug!(header = %header, removed = removed.is_some(), "cleared mapping");
            return Ok(removed);
        };

        let target = self
            .taxonomy
            .field(value)
            .ok_or_else(|| MappingError::UnknownField {
                field: value.to_string(),
            })?;
        let entry = MappingEntry {
            source_header: header.to_string(),
            target_field: target.value.clone(),
            score: score(header, &target.label),
        };
        tracing::debug!(header = %header, field = %value, score = entry.score, "set mapping");

        let claimed_by: Vec<&str> = self
            .mapping
            .headers_for_target(value)
            .into_iter()
            .filter(|other| *other != header)
            .collect();
        if !claimed_by.is_empty() {
            tracing::warn!(
                field = %value,
                headers = ?claimed_by,
                header = %header,
                "target field already mapped from another header"
            );
        }

        Ok(self.mapping.insert(entry))
    }

    /// Current mapping.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Clears every association and score.
    pub fn reset(&mut self) {
        self.mapping.clear();
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn taxonomy(&self) -> &Taxonomy {
        &self.taxonomy
    }

    /// Band for a mapped header; `None` when the header has no mapping.
    pub fn band_for(&self, header: &str) -> Option<ConfidenceBand> {
        self.mapping.score_for(header).map(ConfidenceBand::from_score)
    }

    pub fn unmapped_headers(&self) -> Vec<&str> {
        self.mapping.unmapped_headers(&self.headers)
    }

    pub fn unmapped_fields(&self) -> Vec<&str> {
        self.mapping.unmapped_fields(&self.taxonomy)
    }

    /// Target fields claimed by more than one header.
    pub fn conflicts(&self) -> BTreeMap<String, Vec<String>> {
        self.mapping.conflicts()
    }

    /// Get summary counts.
    pub fn summary(&self) -> MappingSummary {
        let mut summary = MappingSummary {
            total_headers: self.headers.len(),
            mapped: self.mapping.len(),
            unmapped_headers: self.unmapped_headers().len(),
            unmapped_fields: self.unmapped_fields().len(),
            conflicts: self.conflicts().len(),
            ..MappingSummary::default()
        };
        for entry in self.mapping.entries() {
            match ConfidenceBand::from_score(entry.score) {
                ConfidenceBand::High => summary.high += 1,
                ConfidenceBand::Medium => summary.medium += 1,
                ConfidenceBand::Low => summary.low += 1,
            }
        }
        summary
    }

    /// One row per header in file order, for display.
    pub fn rows(&self) -> Vec<MappingRow> {
        self.headers
            .iter()
            .map(|header| {
                let entry = self.mapping.get(header);
                MappingRow {
                    header: header.clone(),
                    field: entry.map(|e| e.target_field.clone()),
                    label: entry
                        .and_then(|e| self.taxonomy.label_for(&e.target_field))
                        .map(str::to_string),
                    score: entry.map(|e| e.score),
                    band: entry.map(|e| ConfidenceBand::from_score(e.score)),
                }
            })
            .collect()
    }

    /// Finalizes the state into its mapping.
    pub fn into_mapping(self) -> Mapping {
        self.mapping
    }
}

/// Counts describing a mapping's coverage and confidence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingSummary {
    pub total_headers: usize,
    pub mapped: usize,
    pub unmapped_headers: usize,
    pub unmapped_fields: usize,
    pub conflicts: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Display row for one source header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingRow {
    pub header: String,
    pub field: Option<String>,
    pub label: Option<String>,
    pub score: Option<f64>,
    pub band: Option<ConfidenceBand>,
}
