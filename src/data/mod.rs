//! Dataset loading and error handling.
//!
//! This module owns the `load(path) -> Table` boundary: delimited files are
//! parsed once at page initialization under a per-dataset schema, and every
//! failure surfaces as a [`DataError`] instead of a silently empty table.
//!
//! ## Error Handling
//!
//! All data operations return `DataResult<T>` which uses the `DataError`
//! type. Common errors include:
//! - `Schema`: a required column is absent from the file
//! - `Format`: a declared-numeric cell does not parse
//! - `ColumnNotFound`: a pipeline referenced a column the table lacks

pub mod csv_parser;
pub mod datasets;
pub mod error;

pub use csv_parser::{Schema, parse_csv_content, parse_csv_file};
pub use error::{DataError, DataResult};
