//! santeboard — the tabular filter-and-aggregate core behind the Occitanie
//! health dashboard.
//!
//! The hosting app loads pre-computed datasets (pathology prevalence,
//! facility registry, communes, emergency distances) into immutable
//! [`types::Table`]s, then re-runs pure [`query::Pipeline`] values — facet
//! selection → aggregation → sort — on every widget interaction and hands
//! the result to a renderer through [`chart`] bindings. No state lives in
//! this crate beyond the loaded tables.

pub mod chart;
pub mod constants;
pub mod dashboard;
pub mod data;
pub mod query;
pub mod store;
pub mod types;

pub use data::error::{DataError, DataResult};
pub use query::{
    AggregateSpec, Direction, FacetSelection, Filter, Pipeline, Reduce, SelectionSet, SortSpec,
};
pub use store::DatasetStore;
pub use types::{Column, ColumnType, Table, Value};
