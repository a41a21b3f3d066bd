//! Core table types for the santeboard data engine.
//!
//! This module defines the immutable, column-typed in-memory relation that
//! every chart and table in the dashboard queries. A [`Table`] is loaded once
//! per dataset file; every transformation (filtering, aggregation, sorting)
//! returns a new `Table` and never mutates the original, so loaded tables can
//! be shared read-only across pipeline invocations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::data::error::{DataError, DataResult};

/// A single cell value.
///
/// Columns are homogeneous: a `Number` column holds `Number` and `Null`
/// cells, a `Text` column holds `Text` and `Null` cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Text(String),
    Number(f64),
    Null,
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the cell. `Text` and `Null` yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Display form used for facet matching and table rendering.
    ///
    /// Whole numbers drop their fractional part so a numeric department
    /// column renders (and matches) as `"31"`, not `"31.0"`.
    pub fn display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            Value::Null => String::new(),
        }
    }

    /// Hashable group key for this cell. `-0.0` and `0.0` collapse to the
    /// same key so they land in the same aggregation bucket.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Text(s) => ValueKey::Text(s.clone()),
            Value::Number(n) => {
                let canonical = if *n == 0.0 { 0.0 } else { *n };
                ValueKey::Number(canonical.to_bits())
            }
            Value::Null => ValueKey::Null,
        }
    }
}

/// Hash/Eq-capable projection of a [`Value`], used as an aggregation group
/// key. `Null` is a valid key: rows with a missing group-by value form their
/// own group rather than being dropped.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Text(String),
    Number(u64),
    Null,
}

/// Declared type of a column, used as a parse hint by the loaders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    #[default]
    Text,
    Number,
}

/// A named, homogeneous sequence of cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            ty,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of non-null cells.
    pub fn non_null_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_null()).count()
    }

    /// Number of distinct non-null cells (the `nunique` KPI).
    pub fn distinct_count(&self) -> usize {
        let mut seen = HashSet::new();
        for value in &self.values {
            if !value.is_null() {
                seen.insert(value.key());
            }
        }
        seen.len()
    }

    /// Sum over non-null numeric cells. `None` when the column holds no
    /// numeric value at all.
    pub fn sum(&self) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for value in &self.values {
            if let Some(n) = value.as_f64() {
                total += n;
                count += 1;
            }
        }
        (count > 0).then_some(total)
    }

    /// Mean over non-null numeric cells. `None` when the column holds no
    /// numeric value at all.
    pub fn mean(&self) -> Option<f64> {
        let mut total = 0.0;
        let mut count = 0usize;
        for value in &self.values {
            if let Some(n) = value.as_f64() {
                total += n;
                count += 1;
            }
        }
        (count > 0).then(|| total / count as f64)
    }
}

/// A read-only view of one logical record.
#[derive(Clone, Copy)]
pub struct RowRef<'a> {
    columns: &'a [Column],
    row: usize,
}

impl<'a> RowRef<'a> {
    /// Cell at the given column index. Compiled predicates resolve indices
    /// up front, so an out-of-range index here is a bug, not user data.
    pub fn value(&self, column: usize) -> &'a Value {
        &self.columns[column].values[self.row]
    }

    /// Cell for a named column, `None` when the column does not exist.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| &c.values[self.row])
    }

    pub fn index(&self) -> usize {
        self.row
    }
}

/// An immutable, column-typed in-memory relation.
///
/// Invariant: every column has the same length; row `i` across columns forms
/// one logical record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table from columns, checking the equal-length invariant.
    pub fn new(columns: Vec<Column>) -> DataResult<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            for column in &columns {
                if column.len() != expected {
                    return Err(DataError::LengthMismatch {
                        expected,
                        actual: column.len(),
                    });
                }
            }
        }
        Ok(Self { columns })
    }

    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> DataResult<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Resolve a column name to its index, for compiled predicates.
    pub fn column_index(&self, name: &str) -> DataResult<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    /// Iterate logical records in row order.
    pub fn rows(&self) -> impl Iterator<Item = RowRef<'_>> {
        (0..self.row_count()).map(|row| RowRef {
            columns: &self.columns,
            row,
        })
    }

    pub fn row(&self, index: usize) -> RowRef<'_> {
        RowRef {
            columns: &self.columns,
            row: index,
        }
    }

    /// Row-filter into a new table. Column order and the relative order of
    /// surviving rows are preserved.
    pub fn select<F>(&self, keep: F) -> Table
    where
        F: Fn(RowRef<'_>) -> bool,
    {
        let indices: Vec<usize> = self
            .rows()
            .filter(|row| keep(*row))
            .map(|row| row.index())
            .collect();
        self.take(&indices)
    }

    /// New table holding the given rows, in the given order.
    pub fn take(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|column| Column {
                name: column.name.clone(),
                ty: column.ty,
                values: indices.iter().map(|&i| column.values[i].clone()).collect(),
            })
            .collect();
        Table { columns }
    }

    /// New table with one extra column appended. The receiver is unchanged.
    pub fn with_column(
        &self,
        name: impl Into<String>,
        ty: ColumnType,
        values: Vec<Value>,
    ) -> DataResult<Table> {
        if values.len() != self.row_count() {
            return Err(DataError::LengthMismatch {
                expected: self.row_count(),
                actual: values.len(),
            });
        }
        let mut columns = self.columns.clone();
        columns.push(Column::new(name, ty, values));
        Ok(Table { columns })
    }
}
