//! Error types for data operations
//!
//! Provides unified error handling for dataset loading and pipeline
//! execution. Note the deliberate absence of an "empty result" error: a
//! filtered or aggregated table with zero rows is a valid value and every
//! renderer is expected to handle it.

use thiserror::Error;

/// Errors that can occur while loading or querying tabular data.
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contained no header line
    #[error("Empty file")]
    EmptyFile,

    /// Header line contained no columns
    #[error("No columns found")]
    NoColumns,

    /// A column required by the dataset schema is absent at load time
    #[error("Missing required column '{column}'")]
    Schema { column: String },

    /// A value could not be parsed as its declared type
    #[error("Cannot parse '{value}' as number in column '{column}' (line {line})")]
    Format {
        column: String,
        line: usize,
        value: String,
    },

    /// A pipeline referenced a column the table does not have. This is a
    /// programming/configuration error, not a user-data error: it must fail
    /// loudly instead of defaulting to an empty result.
    #[error("Column not found: '{0}'")]
    ColumnNotFound(String),

    /// Columns of unequal length were combined into one table
    #[error("Column length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;
