use std::collections::BTreeMap;

use tempfile::TempDir;
use universe_model::{CollectionId, NewCollection, TargetRecord};
use universe_store::{CollectionStore, JsonFileStore, StoreError};

fn new_collection(name: &str) -> NewCollection {
    NewCollection {
        name: name.to_string(),
        kind: "B2B".to_string(),
        record_count: 2,
        mappings: BTreeMap::from([("City".to_string(), "city".to_string())]),
        source_fingerprint: Some("ab".repeat(32)),
    }
}

fn record(id: CollectionId, city: Option<&str>) -> TargetRecord {
    let mut record = TargetRecord::new(id);
    record
        .values
        .insert("city".to_string(), city.map(str::to_string));
    record
}

#[test]
fn create_and_reload_collection() {
    let temp = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(temp.path()).unwrap();

    let created = store.create_collection(new_collection("Prospects")).unwrap();
    assert_eq!(created.id, CollectionId::new(1));
    assert!(temp.path().join("collections/1.json").exists());

    let loaded = store.collection(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.kind, "B2B");
    assert_eq!(loaded.mappings.get("City").map(String::as_str), Some("city"));
}

#[test]
fn records_append_across_batches() {
    let temp = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(temp.path()).unwrap();
    let id = store.create_collection(new_collection("Prospects")).unwrap().id;

    store.insert_records(id, &[record(id, Some("London"))]).unwrap();
    store.insert_records(id, &[record(id, None)]).unwrap();

    let records = store.records(id).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("city"), Some("London"));
    assert!(records[1].has_field("city"));
    assert_eq!(records[1].get("city"), None);

    let lines = std::fs::read_to_string(temp.path().join("records/1.jsonl")).unwrap();
    assert_eq!(lines.lines().count(), 2);
    assert_eq!(
        lines.lines().nth(1),
        Some(r#"{"collection_id":1,"values":{"city":null}}"#)
    );
}

#[test]
fn reopen_continues_after_highest_remaining_id() {
    let temp = TempDir::new().unwrap();
    {
        let mut store = JsonFileStore::open(temp.path()).unwrap();
        for name in ["a", "b", "c"] {
            store.create_collection(new_collection(name)).unwrap();
        }
        store.delete_collection(CollectionId::new(2)).unwrap();
    }
    let mut store = JsonFileStore::open(temp.path()).unwrap();
    let next = store.create_collection(new_collection("d")).unwrap();
    assert_eq!(next.id.get(), 4);
    assert!(store.collection(CollectionId::new(2)).unwrap().is_none());
}

#[test]
fn ids_continue_after_reopen() {
    let temp = TempDir::new().unwrap();
    {
        let mut store = JsonFileStore::open(temp.path()).unwrap();
        store.create_collection(new_collection("a")).unwrap();
        store.create_collection(new_collection("b")).unwrap();
    }
    let mut store = JsonFileStore::open(temp.path()).unwrap();
    let third = store.create_collection(new_collection("c")).unwrap();
    assert_eq!(third.id.get(), 3);

    let names: Vec<String> = store
        .collections()
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn delete_removes_both_files() {
    let temp = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(temp.path()).unwrap();
    let id = store.create_collection(new_collection("a")).unwrap().id;
    store.insert_records(id, &[record(id, Some("Paris"))]).unwrap();

    store.delete_collection(id).unwrap();
    assert!(!temp.path().join("collections/1.json").exists());
    assert!(!temp.path().join("records/1.jsonl").exists());
    assert!(store.collection(id).unwrap().is_none());
    assert!(matches!(store.records(id), Err(StoreError::NotFound { .. })));
}

#[test]
fn insert_into_missing_collection_fails() {
    let temp = TempDir::new().unwrap();
    let mut store = JsonFileStore::open(temp.path()).unwrap();
    let id = CollectionId::new(5);
    let err = store.insert_records(id, &[record(id, None)]).unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[test]
fn corrupt_metadata_is_a_json_error() {
    let temp = TempDir::new().unwrap();
    let store = JsonFileStore::open(temp.path()).unwrap();
    std::fs::write(temp.path().join("collections/7.json"), "{ not json").unwrap();
    let err = store.collection(CollectionId::new(7)).unwrap_err();
    assert!(matches!(err, StoreError::Json { .. }));
}
