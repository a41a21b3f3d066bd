//! Group-by aggregation.
//!
//! Groups rows by the tuple of one or more categorical columns and reduces
//! a value column into a derived summary table: one output row per distinct
//! group tuple, group-by columns first, then the reduced column. Output
//! rows appear in first-appearance order of their group key, which is
//! deterministic — but pipelines that need a display order must chain a
//! sort, never rely on the aggregation's own ordering.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::data::error::DataResult;
use crate::types::{Column, ColumnType, Table, Value, ValueKey};

/// Reduction applied to the value column within each group.
///
/// All reductions consider non-null values only. A group with no non-null
/// value reduces to `Null` — never zero, never an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reduce {
    /// Number of non-null values.
    Count,
    /// Number of distinct non-null values (the `nunique` of the original
    /// facility-typology table).
    CountDistinct,
    /// Arithmetic mean of non-null numeric values.
    Mean,
    /// Sum of non-null numeric values.
    Sum,
}

impl Reduce {
    pub fn label(&self) -> &'static str {
        match self {
            Reduce::Count => "count",
            Reduce::CountDistinct => "nunique",
            Reduce::Mean => "mean",
            Reduce::Sum => "sum",
        }
    }
}

/// One aggregation: group-by tuple, reduced column, reduction, and the
/// name of the output column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AggregateSpec {
    pub group_by: Vec<String>,
    pub value: String,
    pub reduce: Reduce,
    pub alias: Option<String>,
}

impl AggregateSpec {
    pub fn new<I, S>(group_by: I, value: impl Into<String>, reduce: Reduce) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            group_by: group_by.into_iter().map(Into::into).collect(),
            value: value.into(),
            reduce,
            alias: None,
        }
    }

    /// Name the output column, like pandas' named aggregation.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Output column name: the alias if set, else `<reduction>_<column>`.
    pub fn output_name(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| format!("{}_{}", self.reduce.label(), self.value))
    }
}

/// Per-group accumulator. Mean and Sum track the non-null count so an
/// all-null group can yield `Null` instead of zero.
enum Accumulator {
    Count(u64),
    CountDistinct(HashSet<ValueKey>),
    Numeric { total: f64, count: u64 },
}

impl Accumulator {
    fn new(reduce: Reduce) -> Self {
        match reduce {
            Reduce::Count => Accumulator::Count(0),
            Reduce::CountDistinct => Accumulator::CountDistinct(HashSet::new()),
            Reduce::Mean | Reduce::Sum => Accumulator::Numeric {
                total: 0.0,
                count: 0,
            },
        }
    }

    fn push(&mut self, value: &Value) {
        if value.is_null() {
            return;
        }
        match self {
            Accumulator::Count(n) => *n += 1,
            Accumulator::CountDistinct(seen) => {
                seen.insert(value.key());
            }
            Accumulator::Numeric { total, count } => {
                if let Some(n) = value.as_f64() {
                    *total += n;
                    *count += 1;
                }
            }
        }
    }

    fn finish(self, reduce: Reduce) -> Value {
        match self {
            Accumulator::Count(0) => Value::Null,
            Accumulator::Count(n) => Value::Number(n as f64),
            Accumulator::CountDistinct(seen) if seen.is_empty() => Value::Null,
            Accumulator::CountDistinct(seen) => Value::Number(seen.len() as f64),
            Accumulator::Numeric { count: 0, .. } => Value::Null,
            Accumulator::Numeric { total, count } => match reduce {
                Reduce::Mean => Value::Number(total / count as f64),
                _ => Value::Number(total),
            },
        }
    }
}

/// Group and reduce a table.
///
/// `Null` is a valid group key: rows missing a group-by value form their
/// own bucket rather than being dropped or rejected.
pub fn aggregate(table: &Table, spec: &AggregateSpec) -> DataResult<Table> {
    let group_indices: Vec<usize> = spec
        .group_by
        .iter()
        .map(|name| table.column_index(name))
        .collect::<DataResult<_>>()?;
    let value_index = table.column_index(&spec.value)?;

    // First-appearance ordering: remember the first row of each group so
    // the group-key cells can be copied out afterwards.
    let mut slots: HashMap<Vec<ValueKey>, usize> = HashMap::new();
    let mut first_rows: Vec<usize> = Vec::new();
    let mut accumulators: Vec<Accumulator> = Vec::new();

    for row in table.rows() {
        let key: Vec<ValueKey> = group_indices
            .iter()
            .map(|&i| row.value(i).key())
            .collect();
        let slot = *slots.entry(key).or_insert_with(|| {
            first_rows.push(row.index());
            accumulators.push(Accumulator::new(spec.reduce));
            accumulators.len() - 1
        });
        accumulators[slot].push(row.value(value_index));
    }

    let mut columns: Vec<Column> = Vec::with_capacity(group_indices.len() + 1);
    for (&index, name) in group_indices.iter().zip(&spec.group_by) {
        let source = &table.columns()[index];
        let values = first_rows
            .iter()
            .map(|&row| source.values[row].clone())
            .collect();
        columns.push(Column::new(name.clone(), source.ty, values));
    }

    let reduced: Vec<Value> = accumulators
        .into_iter()
        .map(|acc| acc.finish(spec.reduce))
        .collect();
    columns.push(Column::new(spec.output_name(), ColumnType::Number, reduced));

    Table::new(columns)
}
