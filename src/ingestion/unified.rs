//! Unified file-reading entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which reads a CSV or Parquet file into an
//! in-memory [`crate::types::DataSet`] with typed columns.
//!
//! If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.

use std::path::Path;

use crate::error::{IngestError, IngestResult};
use crate::types::DataSet;

use super::{csv, parquet};

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// Comma-separated values.
    Csv,
    /// Apache Parquet.
    Parquet,
}

impl IngestionFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "parquet" | "pq" => Some(Self::Parquet),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> IngestResult<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| IngestError::UnsupportedFormat {
                path: path.to_path_buf(),
            })
    }
}

/// Options controlling file reading.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
}

/// Read a CSV or Parquet file into memory.
///
/// Checks, in order:
///
/// 1. the path exists, else [`IngestError::InputNotFound`];
/// 2. the format is forced by `options` or inferred from the extension, else
///    [`IngestError::UnsupportedFormat`];
/// 3. the format-specific reader succeeds; parser errors are returned as-is.
///
/// ```no_run
/// use tabular_ingest::ingestion::{ingest_from_path, IngestionOptions};
///
/// # fn main() -> Result<(), tabular_ingest::IngestError> {
/// let ds = ingest_from_path("transactions.csv", &IngestionOptions::default())?;
/// println!("rows={}", ds.row_count());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> IngestResult<DataSet> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(IngestError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    let fmt = match options.format {
        Some(f) => f,
        None => IngestionFormat::from_path(path)?,
    };

    match fmt {
        IngestionFormat::Csv => csv::ingest_csv_from_path(path),
        IngestionFormat::Parquet => parquet::ingest_parquet_from_path(path),
    }
}
