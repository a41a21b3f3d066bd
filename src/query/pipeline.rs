//! The per-chart query pipeline.
//!
//! Chains facet selection and fixed filters, optional aggregation, and an
//! optional sort into one deterministic transformation, re-run from scratch
//! on every interaction that changes a facet. The stage order is fixed:
//! filtering always precedes aggregation (the facet narrows the population
//! before grouping) and aggregation always precedes sorting (ranking is
//! computed on the reduced statistic, not raw rows).
//!
//! A pipeline is a pure value: given the same table and a value-equal
//! pipeline, `run` produces an identical result table on every invocation.
//! There is no caching and no incremental state — dataset sizes are tens of
//! thousands of rows and a full re-scan stays well inside interaction
//! latency budgets.

use serde::{Deserialize, Serialize};

use crate::data::error::DataResult;
use crate::query::aggregate::{AggregateSpec, aggregate};
use crate::query::selection::{CompiledFilter, Filter, SelectionSet};
use crate::query::sort::{SortSpec, sort};
use crate::types::Table;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    pub selection: SelectionSet,
    pub filters: Vec<Filter>,
    pub aggregate: Option<AggregateSpec>,
    pub sort: Option<SortSpec>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_selection(mut self, selection: SelectionSet) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_aggregate(mut self, spec: AggregateSpec) -> Self {
        self.aggregate = Some(spec);
        self
    }

    pub fn with_sort(mut self, spec: SortSpec) -> Self {
        self.sort = Some(spec);
        self
    }

    /// Run the pipeline against a table snapshot.
    ///
    /// Every referenced column is resolved up front, so a misconfigured
    /// pipeline fails with `ColumnNotFound` before any row is touched
    /// rather than producing a silently empty result.
    pub fn run(&self, table: &Table) -> DataResult<Table> {
        let rows_in = table.row_count();

        let compiled_selection = self.selection.compile(table)?;
        let compiled_filters: Vec<CompiledFilter<'_>> = self
            .filters
            .iter()
            .map(|filter| filter.compile(table))
            .collect::<DataResult<_>>()?;

        let filtered = if self.selection.is_identity() && compiled_filters.is_empty() {
            table.clone()
        } else {
            table.select(|row| {
                compiled_selection.matches(row)
                    && compiled_filters.iter().all(|filter| filter.matches(row))
            })
        };

        let reduced = match &self.aggregate {
            Some(spec) => aggregate(&filtered, spec)?,
            None => filtered,
        };

        let result = match &self.sort {
            Some(spec) => sort(&reduced, spec)?,
            None => reduced,
        };

        tracing::debug!(
            rows_in,
            rows_filtered = result.row_count(),
            aggregated = self.aggregate.is_some(),
            sorted = self.sort.is_some(),
            "pipeline run"
        );

        Ok(result)
    }
}
