//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestError, IngestResult};
use crate::types::{DataSet, DataType, Field, Schema, Value};

/// Ingest a CSV file into an in-memory [`DataSet`].
///
/// Rules:
///
/// - The first record is the header; every header becomes a column, duplicates included.
/// - Each column gets the narrowest type that fits all of its non-empty cells
///   (`Int64`, then `Float64`, then `Bool`, else `Utf8`).
/// - Empty cells become [`Value::Null`]; a whitespace-only cell is text, kept as written.
pub fn ingest_csv_from_path(path: impl AsRef<Path>) -> IngestResult<DataSet> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestResult<DataSet> {
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_owned).collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        records.push(result?);
    }

    let mut types: Vec<Option<DataType>> = vec![None; headers.len()];
    for record in &records {
        for (slot, raw) in types.iter_mut().zip(record.iter()) {
            if let Some(t) = detect_type(raw) {
                *slot = Some(slot.map_or(t, |cur| cur.unify(t)));
            }
        }
    }
    let types: Vec<DataType> = types
        .into_iter()
        .map(|t| t.unwrap_or(DataType::Utf8))
        .collect();

    let mut rows: Vec<Vec<Value>> = Vec::with_capacity(records.len());
    for (row_idx0, record) in records.iter().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let mut row: Vec<Value> = Vec::with_capacity(headers.len());
        for (col_idx, (name, data_type)) in headers.iter().zip(types.iter()).enumerate() {
            let raw = record.get(col_idx).unwrap_or("");
            row.push(parse_typed_value(user_row, name, *data_type, raw)?);
        }
        rows.push(row);
    }

    let fields = headers
        .into_iter()
        .zip(types)
        .map(|(name, t)| Field::new(name, t))
        .collect();
    Ok(DataSet::new(Schema::new(fields), rows))
}

/// Type of a single raw cell; `None` for an empty cell.
fn detect_type(raw: &str) -> Option<DataType> {
    if raw.is_empty() {
        return None;
    }
    let trimmed = raw.trim();
    if trimmed.parse::<i64>().is_ok() {
        Some(DataType::Int64)
    } else if trimmed.parse::<f64>().is_ok() {
        Some(DataType::Float64)
    } else if parse_bool(trimmed).is_ok() {
        Some(DataType::Bool)
    } else {
        Some(DataType::Utf8)
    }
}

fn parse_typed_value(row: usize, column: &str, data_type: DataType, raw: &str) -> IngestResult<Value> {
    if raw.is_empty() {
        return Ok(Value::Null);
    }
    let trimmed = raw.trim();

    let parse_error = |message: String| IngestError::ParseError {
        row,
        column: column.to_owned(),
        raw: raw.to_owned(),
        message,
    };

    match data_type {
        DataType::Utf8 => Ok(Value::Utf8(raw.to_owned())),
        DataType::Int64 => trimmed
            .parse::<i64>()
            .map(Value::Int64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Float64 => trimmed
            .parse::<f64>()
            .map(Value::Float64)
            .map_err(|e| parse_error(e.to_string())),
        DataType::Bool => parse_bool(trimmed).map(Value::Bool).map_err(parse_error),
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err("expected bool (true/false)".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_type_prefers_narrowest() {
        assert_eq!(detect_type(""), None);
        assert_eq!(detect_type("  "), Some(DataType::Utf8));
        assert_eq!(detect_type("42"), Some(DataType::Int64));
        assert_eq!(detect_type("-4.5"), Some(DataType::Float64));
        assert_eq!(detect_type("True"), Some(DataType::Bool));
        assert_eq!(detect_type("1"), Some(DataType::Int64));
        assert_eq!(detect_type("yes"), Some(DataType::Utf8));
    }

    #[test]
    fn parse_typed_value_reports_row_and_column() {
        let err = parse_typed_value(3, "amount", DataType::Int64, "abc").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 3"));
        assert!(msg.contains("column 'amount'"));
    }
}
