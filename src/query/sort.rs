//! Sorting and top-N ranking.
//!
//! Orders a table by one column with an explicit null policy: rows with a
//! null sort key go last regardless of direction, and ties keep their input
//! order (stable sort). An optional top-N cap truncates after sorting; a
//! table shorter than N is returned whole.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::data::error::DataResult;
use crate::types::{Table, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort column, direction, and optional top-N cap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: String,
    pub direction: Direction,
    pub top_n: Option<usize>,
}

impl SortSpec {
    pub fn ascending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Ascending,
            top_n: None,
        }
    }

    pub fn descending(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            direction: Direction::Descending,
            top_n: None,
        }
    }

    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }
}

/// Order two non-null cells. Numbers sort before text when a column mixes
/// both (possible for untyped columns loaded without a schema hint).
fn cmp_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.total_cmp(y),
        (Value::Text(x), Value::Text(y)) => x.cmp(y),
        (Value::Number(_), Value::Text(_)) => Ordering::Less,
        (Value::Text(_), Value::Number(_)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Stable sort into a new table.
pub fn sort(table: &Table, spec: &SortSpec) -> DataResult<Table> {
    let column = table.column(&spec.column)?;
    let values = &column.values;

    let mut indices: Vec<usize> = (0..table.row_count()).collect();
    indices.sort_by(|&a, &b| {
        let (va, vb) = (&values[a], &values[b]);
        // Nulls last in both directions, by policy.
        match (va.is_null(), vb.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = cmp_values(va, vb);
                match spec.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            }
        }
    });

    if let Some(n) = spec.top_n {
        indices.truncate(n);
    }

    Ok(table.take(&indices))
}
