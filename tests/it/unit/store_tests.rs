//! Unit tests for the shared dataset registry.

use crate::helpers::TestTableBuilder;
use santeboard::DatasetStore;
use std::sync::Arc;

#[test]
fn test_get_shares_the_loaded_table() {
    let store = DatasetStore::new();
    let table = TestTableBuilder::new()
        .text_column("type", &["CHU"])
        .build();

    let inserted = store.insert("finess", table);
    let fetched = store.get("finess").unwrap();
    assert!(Arc::ptr_eq(&inserted, &fetched));
}

#[test]
fn test_missing_dataset_is_none() {
    let store = DatasetStore::new();
    assert!(store.get("communes").is_none());
    assert!(!store.contains("communes"));
    assert!(store.is_empty());
}

#[test]
fn test_names_are_sorted() {
    let store = DatasetStore::new();
    let table = || TestTableBuilder::new().text_column("a", &["x"]).build();
    store.insert("finess", table());
    store.insert("communes", table());
    store.insert("distances", table());

    assert_eq!(store.names(), vec!["communes", "distances", "finess"]);
    assert_eq!(store.len(), 3);
}

#[test]
fn test_reinsert_replaces_handle() {
    let store = DatasetStore::new();
    let first = store.insert(
        "finess",
        TestTableBuilder::new().text_column("a", &["x"]).build(),
    );
    let second = store.insert(
        "finess",
        TestTableBuilder::new().text_column("a", &["x", "y"]).build(),
    );
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(store.get("finess").unwrap().row_count(), 2);
}
