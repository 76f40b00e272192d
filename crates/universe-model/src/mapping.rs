//! Source column to target field associations.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::taxonomy::Taxonomy;

/// One source header associated with one target field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Source column name, verbatim from the file.
    pub source_header: String,
    /// Target field value.
    pub target_field: String,
    /// Confidence (0.0 to 1.0) computed when the association was made.
    pub score: f64,
}

/// Mapping keyed by source header.
///
/// Each target field is expected to appear in at most one entry, but this is
/// not enforced: [`Mapping::conflicts`] reports fields claimed by more than
/// one header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    entries: BTreeMap<String, MappingEntry>,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an entry, returning the one it replaced for the same header.
    pub fn insert(&mut self, entry: MappingEntry) -> Option<MappingEntry> {
        self.entries.insert(entry.source_header.clone(), entry)
    }

    /// Removes the entry for a header.
    pub fn remove(&mut self, header: &str) -> Option<MappingEntry> {
        self.entries.remove(header)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, header: &str) -> Option<&MappingEntry> {
        self.entries.get(header)
    }

    /// Target field value mapped from a header.
    pub fn target_for(&self, header: &str) -> Option<&str> {
        self.get(header).map(|entry| entry.target_field.as_str())
    }

    /// Cached score for a header's mapping.
    pub fn score_for(&self, header: &str) -> Option<f64> {
        self.get(header).map(|entry| entry.score)
    }

    pub fn contains_header(&self, header: &str) -> bool {
        self.entries.contains_key(header)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by header name.
    pub fn entries(&self) -> impl Iterator<Item = &MappingEntry> {
        self.entries.values()
    }

    /// Headers currently mapped to a target field.
    pub fn headers_for_target(&self, field: &str) -> Vec<&str> {
        self.entries
            .values()
            .filter(|entry| entry.target_field == field)
            .map(|entry| entry.source_header.as_str())
            .collect()
    }

    /// Target fields claimed by more than one header.
    pub fn conflicts(&self) -> BTreeMap<String, Vec<String>> {
        let mut by_target: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for entry in self.entries.values() {
            by_target
                .entry(entry.target_field.clone())
                .or_default()
                .push(entry.source_header.clone());
        }
        by_target.retain(|_, headers| headers.len() > 1);
        by_target
    }

    /// Headers (in the given order) with no mapping.
    pub fn unmapped_headers<'a>(&self, headers: &'a [String]) -> Vec<&'a str> {
        headers
            .iter()
            .filter(|header| !self.entries.contains_key(header.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Taxonomy field values (in catalog order) that no header maps to.
    pub fn unmapped_fields<'a>(&self, taxonomy: &'a Taxonomy) -> Vec<&'a str> {
        let used: BTreeSet<&str> = self
            .entries
            .values()
            .map(|entry| entry.target_field.as_str())
            .collect();
        taxonomy
            .fields()
            .iter()
            .map(|field| field.value.as_str())
            .filter(|value| !used.contains(value))
            .collect()
    }

    /// Header to field value pairs, the form stored with a collection.
    pub fn field_map(&self) -> BTreeMap<String, String> {
        self.entries
            .values()
            .map(|entry| (entry.source_header.clone(), entry.target_field.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::{FieldCategory, FieldDef};

    fn entry(header: &str, field: &str, score: f64) -> MappingEntry {
        MappingEntry {
            source_header: header.to_string(),
            target_field: field.to_string(),
            score,
        }
    }

    #[test]
    fn insert_replaces_same_header() {
        let mut mapping = Mapping::new();
        assert!(mapping.insert(entry("City", "city", 1.0)).is_none());
        let previous = mapping.insert(entry("City", "state", 0.2)).unwrap();
        assert_eq!(previous.target_field, "city");
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.target_for("City"), Some("state"));
        assert_eq!(mapping.score_for("City"), Some(0.2));
    }

    #[test]
    fn conflicts_report_shared_targets() {
        let mut mapping = Mapping::new();
        mapping.insert(entry("Email", "email_address", 0.8));
        mapping.insert(entry("E-mail", "email_address", 0.8));
        mapping.insert(entry("City", "city", 1.0));

        let conflicts = mapping.conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts.get("email_address").unwrap(),
            &vec!["E-mail".to_string(), "Email".to_string()]
        );
        assert_eq!(mapping.headers_for_target("city"), vec!["City"]);
    }

    #[test]
    fn unmapped_views() {
        let taxonomy = Taxonomy::new(vec![FieldCategory {
            key: "Contact".to_string(),
            title: "Contact Information".to_string(),
            fields: vec![
                FieldDef {
                    value: "city".to_string(),
                    label: "City".to_string(),
                },
                FieldDef {
                    value: "state".to_string(),
                    label: "State".to_string(),
                },
            ],
        }]);
        let mut mapping = Mapping::new();
        mapping.insert(entry("Town", "city", 0.5));

        let headers = vec!["Town".to_string(), "Notes".to_string()];
        assert_eq!(mapping.unmapped_headers(&headers), vec!["Notes"]);
        assert_eq!(mapping.unmapped_fields(&taxonomy), vec!["state"]);
    }

    #[test]
    fn field_map_drops_scores() {
        let mut mapping = Mapping::new();
        mapping.insert(entry("Full Name", "first_name", 0.4));
        let map = mapping.field_map();
        assert_eq!(map.get("Full Name").map(String::as_str), Some("first_name"));
    }
}
