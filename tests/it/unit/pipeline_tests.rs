//! Unit tests for the pipeline composer: stage order, identity, idempotence
//! and determinism.

use crate::helpers::{TestTableBuilder, display_column, number_column_values};
use santeboard::query::{AggregateSpec, Filter, Pipeline, Reduce, SelectionSet, SortSpec};
use santeboard::DataError;

fn scenario_table() -> santeboard::Table {
    TestTableBuilder::new()
        .text_column("patho", &["A", "A", "B"])
        .text_column("age", &["0-17", "18-64", "0-17"])
        .number_column("prev", &[Some(2.0), Some(5.0), Some(1.0)])
        .build()
}

#[test]
fn test_all_facets_are_identity() {
    let table = scenario_table();
    let pipeline = Pipeline::new()
        .with_selection(SelectionSet::new().with_all("patho").with_all("age"));
    let result = pipeline.run(&table).unwrap();
    assert_eq!(result, table);
}

#[test]
fn test_facet_filter_is_idempotent() {
    let table = scenario_table();
    let selection = SelectionSet::new().with_values("patho", ["A"]);
    let pipeline = Pipeline::new().with_selection(selection);

    let once = pipeline.run(&table).unwrap();
    let twice = pipeline.run(&once).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_end_to_end_filter_then_sort() {
    // Filter patho = {A}, then rank rows by prevalence descending.
    let table = scenario_table();
    let result = Pipeline::new()
        .with_selection(SelectionSet::new().with_values("patho", ["A"]))
        .with_sort(SortSpec::descending("prev"))
        .run(&table)
        .unwrap();

    assert_eq!(display_column(&result, "age"), vec!["18-64", "0-17"]);
    assert_eq!(
        number_column_values(&result, "prev"),
        vec![Some(5.0), Some(2.0)]
    );
}

#[test]
fn test_filtering_precedes_aggregation() {
    // The facet narrows the population before grouping: pathology B must
    // not appear as a group at all, and A's count reflects only its rows.
    let table = scenario_table();
    let result = Pipeline::new()
        .with_selection(SelectionSet::new().with_values("patho", ["A"]))
        .with_aggregate(AggregateSpec::new(["patho"], "prev", Reduce::Count))
        .run(&table)
        .unwrap();

    assert_eq!(result.row_count(), 1);
    assert_eq!(display_column(&result, "patho"), vec!["A"]);
    assert_eq!(
        number_column_values(&result, "count_prev"),
        vec![Some(2.0)]
    );
}

#[test]
fn test_aggregation_precedes_sorting() {
    // Ranking is computed on the reduced statistic, not raw rows: B's
    // single row (1.0) sorts below A's mean (3.5).
    let table = scenario_table();
    let result = Pipeline::new()
        .with_aggregate(AggregateSpec::new(["patho"], "prev", Reduce::Mean))
        .with_sort(SortSpec::descending("mean_prev"))
        .run(&table)
        .unwrap();

    assert_eq!(display_column(&result, "patho"), vec!["A", "B"]);
}

#[test]
fn test_deterministic_across_runs_with_value_equal_selections() {
    let table = scenario_table();

    let build = || {
        Pipeline::new()
            .with_selection(SelectionSet::new().with_values("patho", ["A", "B"]))
            .with_aggregate(AggregateSpec::new(["patho"], "prev", Reduce::Mean))
            .with_sort(SortSpec::descending("mean_prev"))
    };

    // Freshly-constructed but value-equal pipelines, run twice each.
    let first = build().run(&table).unwrap();
    let second = build().run(&table).unwrap();
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first).unwrap();
    let second_json = serde_json::to_string(&second).unwrap();
    assert_eq!(first_json, second_json);
}

#[test]
fn test_empty_result_is_a_table_not_an_error() {
    let table = scenario_table();
    let result = Pipeline::new()
        .with_selection(SelectionSet::new().with_values("patho", ["Z"]))
        .with_sort(SortSpec::descending("prev"))
        .run(&table)
        .unwrap();
    assert_eq!(result.row_count(), 0);
    assert_eq!(result.column_count(), 3);
}

#[test]
fn test_unknown_column_fails_loudly() {
    let table = scenario_table();
    let result = Pipeline::new()
        .with_selection(SelectionSet::new().with_values("pathologie", ["A"]))
        .run(&table);
    assert!(matches!(result, Err(DataError::ColumnNotFound(name)) if name == "pathologie"));

    let result = Pipeline::new()
        .with_filter(Filter::equals("annee", "2023"))
        .run(&table);
    assert!(matches!(result, Err(DataError::ColumnNotFound(_))));
}
