//! CSV parsing with schema hints
//!
//! Parses delimited text files into [`Table`]s. Unlike a generic importer,
//! the dashboard knows exactly which columns each upstream file must carry
//! and which of them are numeric, so parsing is driven by a [`Schema`] of
//! column-type hints rather than type inference: a missing required column
//! fails with [`DataError::Schema`] and an unparseable numeric cell fails
//! with [`DataError::Format`]. Empty cells become [`Value::Null`].

use std::path::Path;

use crate::data::error::{DataError, DataResult};
use crate::types::{Column, ColumnType, Table, Value};

/// Expected columns and their types for one upstream dataset file.
///
/// Columns present in the file but not listed in the schema are kept as
/// `Text`; columns listed in the schema must be present.
#[derive(Clone, Debug, Default)]
pub struct Schema {
    fields: Vec<(String, ColumnType)>,
}

impl Schema {
    pub fn new(fields: &[(&str, ColumnType)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, ty)| (name.to_string(), *ty))
                .collect(),
        }
    }

    /// A schema with no requirements; every column parses as `Text`.
    pub fn permissive() -> Self {
        Self::default()
    }

    pub fn fields(&self) -> &[(String, ColumnType)] {
        &self.fields
    }

    fn type_of(&self, column: &str) -> ColumnType {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, ty)| *ty)
            .unwrap_or(ColumnType::Text)
    }
}

/// Parse a delimited file into a [`Table`].
///
/// The delimiter is detected from the file extension (`.tsv` uses tab) or
/// from content analysis, whichever delimiter appears more frequently.
pub fn parse_csv_file(path: &Path, schema: &Schema) -> DataResult<Table> {
    let content = std::fs::read_to_string(path)?;
    let delimiter = detect_delimiter(path, &content);
    let table = parse_csv_content(&content, delimiter, schema)?;
    tracing::debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "loaded dataset"
    );
    Ok(table)
}

/// Parse delimited content from a string.
pub fn parse_csv_content(content: &str, delimiter: char, schema: &Schema) -> DataResult<Table> {
    let mut lines = content.lines();

    let header_line = lines.next().ok_or(DataError::EmptyFile)?;
    let headers: Vec<String> = split_csv_line(header_line, delimiter)
        .into_iter()
        .map(|s| s.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(DataError::NoColumns);
    }

    for (required, _) in schema.fields() {
        if !headers.iter().any(|h| h == required) {
            return Err(DataError::Schema {
                column: required.clone(),
            });
        }
    }

    let types: Vec<ColumnType> = headers.iter().map(|h| schema.type_of(h)).collect();
    let mut columns: Vec<Vec<Value>> = vec![Vec::new(); headers.len()];

    // Line numbers are 1-based and include the header, matching what a user
    // sees in a text editor.
    for (line_index, line) in lines.enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let cells = split_csv_line(line, delimiter);
        for (col, ty) in types.iter().enumerate() {
            let raw = cells.get(col).map(|s| s.trim()).unwrap_or("");
            let value = parse_cell(raw, *ty).map_err(|value| DataError::Format {
                column: headers[col].clone(),
                line: line_index + 2,
                value,
            })?;
            columns[col].push(value);
        }
    }

    let columns = headers
        .into_iter()
        .zip(types)
        .zip(columns)
        .map(|((name, ty), values)| Column::new(name, ty, values))
        .collect();

    Table::new(columns)
}

/// Parse one cell under a type hint. Returns the offending raw text on
/// failure so the caller can attach column/line context.
fn parse_cell(raw: &str, ty: ColumnType) -> Result<Value, String> {
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    match ty {
        ColumnType::Text => Ok(Value::Text(raw.to_string())),
        ColumnType::Number => raw
            .parse::<f64>()
            .map(Value::Number)
            .map_err(|_| raw.to_string()),
    }
}

/// Detect the delimiter to use for parsing
fn detect_delimiter(path: &Path, content: &str) -> char {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if ext.to_lowercase() == "tsv" {
            return '\t';
        }
    }

    // Count delimiters in the first few lines to determine the most likely
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let semicolon_count = first_lines.matches(';').count();

    if tab_count > comma_count && tab_count > semicolon_count {
        '\t'
    } else if semicolon_count > comma_count {
        ';'
    } else {
        ','
    }
}

/// Split a CSV line respecting quoted fields
fn split_csv_line(line: &str, delimiter: char) -> Vec<&str> {
    let mut result = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let chars: Vec<char> = line.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c == '"' {
            in_quotes = !in_quotes;
        } else if c == delimiter && !in_quotes {
            let field = &line[start..byte_index(line, i)];
            result.push(unquote(field));
            start = byte_index(line, i + 1);
        }
    }

    if start <= line.len() {
        let field = &line[start..];
        result.push(unquote(field));
    }

    result
}

/// Get byte index for character position in string
fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Remove surrounding quotes from a field
fn unquote(s: &str) -> &str {
    let trimmed = s.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}
