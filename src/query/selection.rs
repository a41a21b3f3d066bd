//! Facet selections and row filters.
//!
//! A facet is a categorical dimension the user filters by via a multi-select
//! control (facility type, department, commune, activity). Each widget maps
//! to a [`FacetSelection`]; a [`SelectionSet`] AND-composes them into one
//! row predicate. The "select all" state is an explicit [`FacetSelection::All`]
//! sentinel, *not* the full value set, so it stays correct when the distinct
//! values of the underlying table change between loads — and it is a
//! different concept from data rows whose label literally means "all"
//! (see `constants::ALL_AGES_LABEL`).
//!
//! [`Filter`] covers the non-facet row predicates the dashboard pages also
//! need: fixed category sets, substring matches on activity labels, and the
//! exclusion lists applied to pathology groups.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::data::error::DataResult;
use crate::types::{RowRef, Table, Value};

/// One multi-select widget's state: everything, or an explicit subset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FacetSelection {
    /// No row excluded by this facet (the identity predicate).
    All,
    /// Keep rows whose value for the facet column is in this set. Values are
    /// compared on their display form, so `"31"` matches a numeric 31.
    Values(BTreeSet<String>),
}

impl FacetSelection {
    pub fn values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FacetSelection::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, FacetSelection::All)
    }
}

/// The full filter state of a page: facet column → selection.
///
/// Ordered map so two selections built in different widget order are equal
/// by value, which the pipeline's determinism guarantee relies on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    facets: BTreeMap<String, FacetSelection>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_all(mut self, column: impl Into<String>) -> Self {
        self.facets.insert(column.into(), FacetSelection::All);
        self
    }

    pub fn with_values<I, S>(mut self, column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.facets
            .insert(column.into(), FacetSelection::values(values));
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, selection: FacetSelection) {
        self.facets.insert(column.into(), selection);
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// True when no facet can exclude a row (zero facets, or all `All`).
    pub fn is_identity(&self) -> bool {
        self.facets.values().all(FacetSelection::is_all)
    }

    pub fn facets(&self) -> impl Iterator<Item = (&str, &FacetSelection)> {
        self.facets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolve facet columns against a table.
    ///
    /// Every facet column must exist, `All` facets included: referencing a
    /// missing column is a configuration error even when the facet would not
    /// filter anything. Checks are ordered most-selective first so the AND
    /// short-circuits cheaply; this affects performance only, never the
    /// result.
    pub fn compile<'a>(&'a self, table: &Table) -> DataResult<CompiledSelection<'a>> {
        let mut checks = Vec::new();
        for (column, selection) in &self.facets {
            let index = table.column_index(column)?;
            if let FacetSelection::Values(values) = selection {
                checks.push(Check { index, values });
            }
        }
        checks.sort_by_key(|check| check.values.len());
        Ok(CompiledSelection { checks })
    }
}

struct Check<'a> {
    index: usize,
    values: &'a BTreeSet<String>,
}

/// A [`SelectionSet`] with columns resolved to indices, ready to evaluate
/// per row.
pub struct CompiledSelection<'a> {
    checks: Vec<Check<'a>>,
}

impl CompiledSelection<'_> {
    /// AND of all non-`All` facets. A null cell never matches a subset
    /// selection: the row is filtered out, never a crash.
    pub fn matches(&self, row: RowRef<'_>) -> bool {
        self.checks.iter().all(|check| {
            let value = row.value(check.index);
            !value.is_null() && check.values.contains(&value.display())
        })
    }
}

/// A non-facet row predicate.
///
/// These back the fixed filters the dashboard pages hard-code: the excluded
/// pathology groups, the `tous âges` row exclusion, the "urgence" activity
/// subset, and fixed-category-set chart configurations.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    /// Row value is a member of the set.
    IsIn { column: String, values: BTreeSet<String> },
    /// Row value equals the literal. Null never matches.
    Equals { column: String, value: String },
    /// Row value differs from the literal. Null rows *do* match, mirroring
    /// how an exclusion like `!= "tous âges"` keeps rows with a missing age
    /// band.
    NotEquals { column: String, value: String },
    /// Case-insensitive substring match on text cells.
    Contains { column: String, needle: String },
    /// Case-insensitive substring match against any of several needles.
    ContainsAny { column: String, needles: Vec<String> },
    /// Negation of the inner filter.
    Not(Box<Filter>),
}

impl Filter {
    pub fn is_in<I, S>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::IsIn {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(column: impl Into<String>, value: impl Into<String>) -> Self {
        Filter::NotEquals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn contains(column: impl Into<String>, needle: impl Into<String>) -> Self {
        Filter::Contains {
            column: column.into(),
            needle: needle.into(),
        }
    }

    pub fn contains_any<I, S>(column: impl Into<String>, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Filter::ContainsAny {
            column: column.into(),
            needles: needles.into_iter().map(Into::into).collect(),
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(filter: Filter) -> Self {
        Filter::Not(Box::new(filter))
    }

    /// Resolve the filter's column against a table.
    pub fn compile(&self, table: &Table) -> DataResult<CompiledFilter<'_>> {
        let compiled = match self {
            Filter::IsIn { column, values } => CompiledFilter::IsIn {
                index: table.column_index(column)?,
                values,
            },
            Filter::Equals { column, value } => CompiledFilter::Equals {
                index: table.column_index(column)?,
                value,
            },
            Filter::NotEquals { column, value } => CompiledFilter::NotEquals {
                index: table.column_index(column)?,
                value,
            },
            Filter::Contains { column, needle } => CompiledFilter::Contains {
                index: table.column_index(column)?,
                needle: needle.to_lowercase(),
            },
            Filter::ContainsAny { column, needles } => CompiledFilter::ContainsAny {
                index: table.column_index(column)?,
                needles: needles.iter().map(|n| n.to_lowercase()).collect(),
            },
            Filter::Not(inner) => CompiledFilter::Not(Box::new(inner.compile(table)?)),
        };
        Ok(compiled)
    }
}

/// A [`Filter`] with its column resolved and needles lowercased.
pub enum CompiledFilter<'a> {
    IsIn {
        index: usize,
        values: &'a BTreeSet<String>,
    },
    Equals {
        index: usize,
        value: &'a str,
    },
    NotEquals {
        index: usize,
        value: &'a str,
    },
    Contains {
        index: usize,
        needle: String,
    },
    ContainsAny {
        index: usize,
        needles: Vec<String>,
    },
    Not(Box<CompiledFilter<'a>>),
}

impl CompiledFilter<'_> {
    pub fn matches(&self, row: RowRef<'_>) -> bool {
        match self {
            CompiledFilter::IsIn { index, values } => {
                let value = row.value(*index);
                !value.is_null() && values.contains(&value.display())
            }
            CompiledFilter::Equals { index, value } => {
                let cell = row.value(*index);
                !cell.is_null() && cell.display() == *value
            }
            CompiledFilter::NotEquals { index, value } => {
                let cell = row.value(*index);
                cell.is_null() || cell.display() != *value
            }
            CompiledFilter::Contains { index, needle } => {
                contains_lowercase(row.value(*index), needle)
            }
            CompiledFilter::ContainsAny { index, needles } => {
                let cell = row.value(*index);
                needles.iter().any(|needle| contains_lowercase(cell, needle))
            }
            CompiledFilter::Not(inner) => !inner.matches(row),
        }
    }
}

fn contains_lowercase(cell: &Value, lowered_needle: &str) -> bool {
    match cell.as_str() {
        Some(text) => text.to_lowercase().contains(lowered_needle),
        None => false,
    }
}
