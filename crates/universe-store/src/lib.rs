//! Storage collaborator for collections ("universes") and their records.
//!
//! Creating a collection and inserting its records are two separate calls;
//! nothing here makes the pair atomic.

#![deny(unsafe_code)]

mod error;
mod file;
mod memory;

use universe_model::{Collection, CollectionId, NewCollection, TargetRecord};

pub use error::{Result, StoreError};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

/// Persistence for collections and their records.
pub trait CollectionStore {
    /// Creates a collection and assigns its id.
    fn create_collection(&mut self, new: NewCollection) -> Result<Collection>;

    /// Appends records to an existing collection; returns how many were stored.
    ///
    /// Every record must carry `id` as its collection id.
    fn insert_records(&mut self, id: CollectionId, records: &[TargetRecord]) -> Result<usize>;

    /// Deletes a collection and all of its records.
    fn delete_collection(&mut self, id: CollectionId) -> Result<()>;

    fn collection(&self, id: CollectionId) -> Result<Option<Collection>>;

    /// Records of a collection in insertion order.
    fn records(&self, id: CollectionId) -> Result<Vec<TargetRecord>>;

    /// All collections ordered by id.
    fn collections(&self) -> Result<Vec<Collection>>;
}

/// Rejects records tagged with another collection id.
pub(crate) fn check_ownership(id: CollectionId, records: &[TargetRecord]) -> Result<()> {
    match records.iter().find(|record| record.collection_id != id) {
        Some(record) => Err(StoreError::Rejected {
            message: format!(
                "record for collection {} inserted into collection {id}",
                record.collection_id
            ),
        }),
        None => Ok(()),
    }
}
