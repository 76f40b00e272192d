//! In-memory store.

use std::collections::BTreeMap;

use chrono::Utc;
use universe_model::{Collection, CollectionId, NewCollection, TargetRecord};

use crate::{CollectionStore, Result, StoreError, check_ownership};

/// Store backed by in-process maps. Ids start at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    last_id: u64,
    collections: BTreeMap<CollectionId, Collection>,
    records: BTreeMap<CollectionId, Vec<TargetRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total records across all collections.
    pub fn record_total(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }
}

impl CollectionStore for MemoryStore {
    fn create_collection(&mut self, new: NewCollection) -> Result<Collection> {
        self.last_id += 1;
        let id = CollectionId::new(self.last_id);
        let collection = Collection::from_new(id, new, Utc::now());
        self.collections.insert(id, collection.clone());
        self.records.insert(id, Vec::new());
        Ok(collection)
    }

    fn insert_records(&mut self, id: CollectionId, records: &[TargetRecord]) -> Result<usize> {
        let stored = self
            .records
            .get_mut(&id)
            .ok_or(StoreError::NotFound { id })?;
        check_ownership(id, records)?;
        stored.extend_from_slice(records);
        Ok(records.len())
    }

    fn delete_collection(&mut self, id: CollectionId) -> Result<()> {
        self.collections
            .remove(&id)
            .ok_or(StoreError::NotFound { id })?;
        self.records.remove(&id);
        Ok(())
    }

    fn collection(&self, id: CollectionId) -> Result<Option<Collection>> {
        Ok(self.collections.get(&id).cloned())
    }

    fn records(&self, id: CollectionId) -> Result<Vec<TargetRecord>> {
        self.records
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    fn collections(&self) -> Result<Vec<Collection>> {
        Ok(self.collections.values().cloned().collect())
    }
}
