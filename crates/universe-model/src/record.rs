//! Raw source rows and transformed target records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::collection::CollectionId;

/// One data row of the uploaded file, keyed by header.
///
/// Cells keep file order. Empty cells are `None`. When a header occurs more
/// than once, lookups by name return the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    cells: Vec<(String, Option<String>)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a cell, treating an empty string as absent.
    pub fn push(&mut self, header: impl Into<String>, value: Option<String>) {
        let value = value.filter(|v| !v.is_empty());
        self.cells.push((header.into(), value));
    }

    /// Builds a row from `(header, value)` pairs; empty strings become absent.
    pub fn from_pairs<H, V>(pairs: impl IntoIterator<Item = (H, V)>) -> Self
    where
        H: Into<String>,
        V: Into<String>,
    {
        let mut row = Self::new();
        for (header, value) in pairs {
            row.push(header, Some(value.into()));
        }
        row
    }

    /// Value for a header; `None` when the header is missing or the cell empty.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == header)
            .and_then(|(_, value)| value.as_deref())
    }

    pub fn contains_header(&self, header: &str) -> bool {
        self.cells.iter().any(|(name, _)| name == header)
    }

    /// Cells in file order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.cells
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// One row transformed into the target schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRecord {
    /// Collection that owns this record.
    pub collection_id: CollectionId,
    /// Target field value to cell value. Only mapped fields appear.
    pub values: BTreeMap<String, Option<String>>,
}

impl TargetRecord {
    pub fn new(collection_id: CollectionId) -> Self {
        Self {
            collection_id,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).and_then(|value| value.as_deref())
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_cells_are_absent() {
        let row = RawRow::from_pairs([("Full Name", "Ada"), ("E-mail", "")]);
        assert_eq!(row.get("Full Name"), Some("Ada"));
        assert_eq!(row.get("E-mail"), None);
        assert!(row.contains_header("E-mail"));
        assert!(!row.contains_header("Phone"));
    }

    #[test]
    fn duplicate_headers_resolve_to_first() {
        let row = RawRow::from_pairs([("Name", "first"), ("Name", "second")]);
        assert_eq!(row.get("Name"), Some("first"));
        assert_eq!(row.len(), 2);
    }
}
