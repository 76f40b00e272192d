//! Persisted collection ("universe") metadata.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned by the storage collaborator.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CollectionId(u64);

impl CollectionId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Request to create a collection for one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCollection {
    pub name: String,
    /// User-supplied type label.
    #[serde(rename = "type")]
    pub kind: String,
    /// Record count declared at ingestion time.
    pub record_count: usize,
    /// Final header to field value mapping.
    pub mappings: BTreeMap<String, String>,
    /// SHA-256 of the source file, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fingerprint: Option<String>,
}

/// A stored collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub record_count: usize,
    pub mappings: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_fingerprint: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Collection {
    /// Materializes a collection from a creation request.
    pub fn from_new(id: CollectionId, new: NewCollection, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            kind: new.kind,
            record_count: new.record_count,
            mappings: new.mappings,
            source_fingerprint: new.source_fingerprint,
            created_at,
        }
    }
}
