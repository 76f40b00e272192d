//! Auto-mapping engine.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use universe_model::{Mapping, MappingEntry, TargetField, Taxonomy};

use crate::score::{ConfidenceBand, score};

/// A header is auto-mapped only when its best score is strictly above this.
pub const AUTO_MAP_THRESHOLD: f64 = 0.6;

/// Returns true if a score is high enough to auto-map.
pub fn exceeds_threshold(score: f64) -> bool {
    score > AUTO_MAP_THRESHOLD
}

/// Result of an auto-mapping pass.
#[derive(Debug, Clone, Default)]
pub struct MappingResult {
    /// Proposed associations with their scores.
    pub mapping: Mapping,
    /// Headers (in file order) whose best score did not clear the threshold.
    pub unmapped_headers: Vec<String>,
}

impl MappingResult {
    /// Returns the count of mappings in each band.
    pub fn count_by_band(&self) -> BTreeMap<ConfidenceBand, usize> {
        let mut counts = BTreeMap::new();
        for entry in self.mapping.entries() {
            *counts.entry(ConfidenceBand::from_score(entry.score)).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the minimum score among all mappings, if any.
    pub fn min_score(&self) -> Option<f64> {
        self.mapping
            .entries()
            .map(|entry| entry.score)
            .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
    }

    /// Returns the mean score among all mappings, if any.
    pub fn mean_score(&self) -> Option<f64> {
        if self.mapping.is_empty() {
            return None;
        }
        let sum: f64 = self.mapping.entries().map(|entry| entry.score).sum();
        Some(sum / self.mapping.len() as f64)
    }
}

/// A scored target field for one header.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<'a> {
    pub field: &'a TargetField,
    pub score: f64,
}

/// Proposes mappings from source headers to taxonomy fields.
///
/// Each header is matched independently against every field label; the
/// single best field wins (earlier fields win ties) and is kept only if it
/// clears [`AUTO_MAP_THRESHOLD`]. Target fields are not reserved, so two
/// headers may be mapped to the same field.
pub struct MappingEngine<'a> {
    taxonomy: &'a Taxonomy,
}

impl<'a> MappingEngine<'a> {
    pub fn new(taxonomy: &'a Taxonomy) -> Self {
        Self { taxonomy }
    }

    /// Suggests a mapping for headers in file order.
    pub fn suggest(&self, headers: &[String]) -> MappingResult {
        let mut result = MappingResult::default();
        for header in headers {
            match self.best_match(header) {
                Some(candidate) if exceeds_threshold(candidate.score) => {
                    tracing::debug!(
                        header = %header,
                        field = %candidate.field.value,
                        score = candidate.score,
                        "auto-mapped header"
                    );
                    result.mapping.insert(MappingEntry {
                        source_header: header.clone(),
                        target_field: candidate.field.value.clone(),
                        score: candidate.score,
                    });
                }
                _ => result.unmapped_headers.push(header.clone()),
            }
        }

        let conflicts = result.mapping.conflicts();
        if !conflicts.is_empty() {
            tracing::warn!(
                fields = ?conflicts.keys().collect::<Vec<_>>(),
                "auto-mapping assigned the same field to several headers"
            );
        }
        tracing::info!(
            headers = headers.len(),
            mapped = result.mapping.len(),
            unmapped = result.unmapped_headers.len(),
            "auto-mapping complete"
        );
        result
    }

    /// Best-scoring field for a header regardless of threshold.
    ///
    /// Returns `None` only when the taxonomy is empty.
    pub fn best_match(&self, header: &str) -> Option<Candidate<'a>> {
        let mut best: Option<Candidate<'a>> = None;
        for field in self.taxonomy.fields() {
            let score = score(header, &field.label);
            if best.as_ref().is_none_or(|current| score > current.score) {
                best = Some(Candidate { field, score });
            }
        }
        best
    }

    /// All fields scored against a header, highest first.
    ///
    /// Fields with equal scores keep catalog order.
    pub fn rank(&self, header: &str) -> Vec<Candidate<'a>> {
        let mut candidates: Vec<Candidate<'a>> = self
            .taxonomy
            .fields()
            .iter()
            .map(|field| Candidate {
                field,
                score: score(header, &field.label),
            })
            .collect();
        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use universe_model::{FieldCategory, FieldDef};

    fn taxonomy(fields: &[(&str, &str)]) -> Taxonomy {
        Taxonomy::new(vec![FieldCategory {
            key: "Test".to_string(),
            title: "Test".to_string(),
            fields: fields
                .iter()
                .map(|(value, label)| FieldDef {
                    value: value.to_string(),
                    label: label.to_string(),
                })
                .collect(),
        }])
    }

    #[test]
    fn threshold_is_strict() {
        assert!(!exceeds_threshold(0.6));
        assert!(exceeds_threshold(0.6000001));
    }

    #[test]
    fn score_of_exactly_threshold_is_not_mapped() {
        // "abcde" vs "abxye": distance 2 over 5 characters = 0.6
        let taxonomy = taxonomy(&[("target", "abxye")]);
        let engine = MappingEngine::new(&taxonomy);
        let headers = vec!["abcde".to_string()];

        assert_eq!(engine.best_match("abcde").unwrap().score, 0.6);
        let result = engine.suggest(&headers);
        assert!(result.mapping.is_empty());
        assert_eq!(result.unmapped_headers, headers);
    }

    #[test]
    fn score_just_above_threshold_is_mapped() {
        // distance 3 over 8 characters = 0.625
        let taxonomy = taxonomy(&[("target", "abcdexyz")]);
        let engine = MappingEngine::new(&taxonomy);
        let result = engine.suggest(&["abcdeqrs".to_string()]);
        assert_eq!(result.mapping.target_for("abcdeqrs"), Some("target"));
        assert_eq!(result.mapping.score_for("abcdeqrs"), Some(0.625));
    }

    #[test]
    fn ties_keep_the_first_field() {
        let taxonomy = taxonomy(&[("zip", "ZIP Code"), ("zip4", "ZIP+4")]);
        let engine = MappingEngine::new(&taxonomy);
        let best = engine.best_match("ZIP").unwrap();
        assert_eq!(best.field.value, "zip");
        assert_eq!(best.score, 0.8);
    }

    #[test]
    fn rank_orders_by_score() {
        let taxonomy = taxonomy(&[("state", "State"), ("city", "City")]);
        let engine = MappingEngine::new(&taxonomy);
        let ranked = engine.rank("City");
        assert_eq!(ranked[0].field.value, "city");
        assert_eq!(ranked[0].score, 1.0);
        assert_eq!(ranked[1].field.value, "state");
    }

    #[test]
    fn empty_taxonomy_maps_nothing() {
        let taxonomy = Taxonomy::new(Vec::new());
        let engine = MappingEngine::new(&taxonomy);
        assert!(engine.best_match("City").is_none());
        let result = engine.suggest(&["City".to_string()]);
        assert_eq!(result.unmapped_headers, vec!["City".to_string()]);
    }

    #[test]
    fn result_statistics() {
        let taxonomy = taxonomy(&[("city", "City"), ("phone_number", "Phone Number")]);
        let engine = MappingEngine::new(&taxonomy);
        let result = engine.suggest(&["City".to_string(), "Phone".to_string()]);

        let counts = result.count_by_band();
        assert_eq!(counts.get(&ConfidenceBand::High), Some(&1));
        assert_eq!(counts.get(&ConfidenceBand::Medium), Some(&1));
        assert_eq!(result.min_score(), Some(0.8));
        assert!((result.mean_score().unwrap() - 0.9).abs() < 1e-12);
    }
}
