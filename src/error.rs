use std::path::PathBuf;

use thiserror::Error;

use crate::naming::IdentifierRole;

/// Convenience result type for ingestion operations.
pub type IngestResult<T> = Result<T, IngestError>;

/// Error type returned by every stage of an ingestion run.
///
/// Configuration, input and identifier problems are raised by this crate before any database
/// work happens. Failures from the file parsers and the database driver are carried as-is in
/// their own variants.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Required configuration (the database connection string) is missing or unreadable.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The input path does not exist on disk.
    #[error("input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// The input path does not end in a recognized extension.
    #[error("unsupported file format for {}: use .parquet or .csv", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A schema or table name is not a bareword identifier.
    #[error(
        "invalid {role} name: {value:?}. Use only letters, numbers and underscores, not starting with a digit."
    )]
    Validation { role: IdentifierRole, value: String },

    /// Two source columns normalized to the same name and the duplicate policy rejects that.
    #[error("duplicate column name '{name}' after normalization")]
    DuplicateColumn { name: String },

    /// The in-memory table is not shaped the way an operation expects.
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be converted into the column's inferred type.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },

    /// Underlying I/O error (e.g. permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet parsing error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// Connection, DDL or COPY failure reported by PostgreSQL.
    #[error("database error: {0}")]
    Database(#[from] postgres::Error),
}
