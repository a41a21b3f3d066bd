//! Unit tests for facet selections: the ALL sentinel, value equality, and
//! serde round-trips.

use crate::helpers::TestTableBuilder;
use santeboard::query::{FacetSelection, SelectionSet};

#[test]
fn test_all_is_not_the_full_value_set() {
    // A table grows a new facility type between loads. An explicit subset
    // that happened to cover every old value now excludes the new one; the
    // ALL sentinel keeps meaning "no row excluded".
    let old_table = TestTableBuilder::new()
        .text_column("type", &["CHU", "Clinique"])
        .build();
    let new_table = TestTableBuilder::new()
        .text_column("type", &["CHU", "Clinique", "EHPAD"])
        .build();

    let frozen_subset = SelectionSet::new().with_values("type", ["CHU", "Clinique"]);
    let all = SelectionSet::new().with_all("type");

    let compiled = frozen_subset.compile(&old_table).unwrap();
    assert_eq!(old_table.select(|r| compiled.matches(r)).row_count(), 2);

    let compiled = frozen_subset.compile(&new_table).unwrap();
    assert_eq!(new_table.select(|r| compiled.matches(r)).row_count(), 2);

    let compiled = all.compile(&new_table).unwrap();
    assert_eq!(new_table.select(|r| compiled.matches(r)).row_count(), 3);
}

#[test]
fn test_value_equality_ignores_construction_order() {
    let a = SelectionSet::new()
        .with_values("type", ["CHU", "EHPAD"])
        .with_values("departement", ["31"]);
    let b = SelectionSet::new()
        .with_values("departement", ["31"])
        .with_values("type", ["EHPAD", "CHU"]);
    assert_eq!(a, b);
}

#[test]
fn test_selection_serde_round_trip() {
    let selection = SelectionSet::new()
        .with_all("departement")
        .with_values("type", ["CHU"]);

    let json = serde_json::to_string(&selection).unwrap();
    let back: SelectionSet = serde_json::from_str(&json).unwrap();
    assert_eq!(selection, back);
}

#[test]
fn test_facet_selection_tags_survive_serde() {
    let all = FacetSelection::All;
    let json = serde_json::to_string(&all).unwrap();
    let back: FacetSelection = serde_json::from_str(&json).unwrap();
    assert!(back.is_all());

    // The sentinel is a distinct tag, not an empty or full value set.
    let empty = FacetSelection::values(Vec::<String>::new());
    assert_ne!(all, empty);
}

#[test]
fn test_empty_selection_is_identity() {
    let table = TestTableBuilder::new()
        .text_column("type", &["CHU", "Clinique"])
        .build();
    let selection = SelectionSet::new();
    assert!(selection.is_identity());
    let compiled = selection.compile(&table).unwrap();
    assert_eq!(table.select(|r| compiled.matches(r)), table);
}
