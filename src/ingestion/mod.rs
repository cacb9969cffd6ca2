//! File reading: CSV and Parquet into an in-memory [`crate::types::DataSet`].
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - checks the input exists and has a recognized extension (or a forced format via
//!   [`IngestionOptions`])
//! - reads the file with typed columns: inferred for CSV, taken from the file schema for Parquet
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`parquet`]

pub mod csv;
pub mod parquet;
pub mod unified;

pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions};
