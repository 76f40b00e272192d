//! Directory-backed JSON store.
//!
//! # Storage Format
//!
//! ```text
//! <root>/collections/{id}.json   pretty-printed collection metadata
//! <root>/records/{id}.jsonl      one record per line, appended per batch
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use universe_model::{Collection, CollectionId, NewCollection, TargetRecord};

use crate::{CollectionStore, Result, StoreError, check_ownership};

const COLLECTIONS_DIR: &str = "collections";
const RECORDS_DIR: &str = "records";

/// Store that keeps collections as JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
    last_id: u64,
}

impl JsonFileStore {
    /// Opens a store, creating its directories if needed.
    ///
    /// New ids continue after the highest id already on disk.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        for dir in [COLLECTIONS_DIR, RECORDS_DIR] {
            let path = root.join(dir);
            fs::create_dir_all(&path).map_err(|e| StoreError::io(&path, e))?;
        }
        let mut store = Self { root, last_id: 0 };
        store.last_id = store
            .collection_ids()?
            .into_iter()
            .last()
            .map_or(0, CollectionId::get);
        tracing::debug!(root = %store.root.display(), last_id = store.last_id, "opened store");
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn collection_path(&self, id: CollectionId) -> PathBuf {
        self.root.join(COLLECTIONS_DIR).join(format!("{id}.json"))
    }

    fn records_path(&self, id: CollectionId) -> PathBuf {
        self.root.join(RECORDS_DIR).join(format!("{id}.jsonl"))
    }

    fn collection_ids(&self) -> Result<Vec<CollectionId>> {
        let dir = self.root.join(COLLECTIONS_DIR);
        let mut ids = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| StoreError::io(&dir, e))? {
            let entry = entry.map_err(|e| StoreError::io(&dir, e))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(id) = path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .and_then(|stem| stem.parse::<u64>().ok())
            {
                ids.push(CollectionId::new(id));
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn read_collection(&self, path: &Path) -> Result<Collection> {
        let contents = fs::read_to_string(path).map_err(|e| StoreError::io(path, e))?;
        serde_json::from_str(&contents).map_err(|e| StoreError::json(path, e))
    }
}

impl CollectionStore for JsonFileStore {
    fn create_collection(&mut self, new: NewCollection) -> Result<Collection> {
        let id = CollectionId::new(self.last_id + 1);
        let collection = Collection::from_new(id, new, Utc::now());

        let path = self.collection_path(id);
        let json =
            serde_json::to_string_pretty(&collection).map_err(|e| StoreError::json(&path, e))?;
        fs::write(&path, json).map_err(|e| StoreError::io(&path, e))?;
        let records = self.records_path(id);
        File::create(&records).map_err(|e| StoreError::io(&records, e))?;

        self.last_id = id.get();
        tracing::info!(id = %id, name = %collection.name, "created collection");
        Ok(collection)
    }

    fn insert_records(&mut self, id: CollectionId, records: &[TargetRecord]) -> Result<usize> {
        if !self.collection_path(id).exists() {
            return Err(StoreError::NotFound { id });
        }
        check_ownership(id, records)?;

        let path = self.records_path(id);
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StoreError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        for record in records {
            serde_json::to_writer(&mut writer, record).map_err(|e| StoreError::json(&path, e))?;
            writer
                .write_all(b"\n")
                .map_err(|e| StoreError::io(&path, e))?;
        }
        writer.flush().map_err(|e| StoreError::io(&path, e))?;
        tracing::debug!(id = %id, records = records.len(), "appended records");
        Ok(records.len())
    }

    fn delete_collection(&mut self, id: CollectionId) -> Result<()> {
        let path = self.collection_path(id);
        if !path.exists() {
            return Err(StoreError::NotFound { id });
        }
        fs::remove_file(&path).map_err(|e| StoreError::io(&path, e))?;
        let records = self.records_path(id);
        if records.exists() {
            fs::remove_file(&records).map_err(|e| StoreError::io(&records, e))?;
        }
        tracing::info!(id = %id, "deleted collection");
        Ok(())
    }

    fn collection(&self, id: CollectionId) -> Result<Option<Collection>> {
        let path = self.collection_path(id);
        if !path.exists() {
            return Ok(None);
        }
        self.read_collection(&path).map(Some)
    }

    fn records(&self, id: CollectionId) -> Result<Vec<TargetRecord>> {
        if !self.collection_path(id).exists() {
            return Err(StoreError::NotFound { id });
        }
        let path = self.records_path(id);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let file = File::open(&path).map_err(|e| StoreError::io(&path, e))?;
        let mut records = Vec::new();
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| StoreError::io(&path, e))?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(serde_json::from_str(&line).map_err(|e| StoreError::json(&path, e))?);
        }
        Ok(records)
    }

    fn collections(&self) -> Result<Vec<Collection>> {
        self.collection_ids()?
            .into_iter()
            .map(|id| self.read_collection(&self.collection_path(id)))
            .collect()
    }
}
