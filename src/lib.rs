//! `tabular-ingest` loads a CSV or Parquet file into a PostgreSQL table.
//!
//! A run reads the file into an in-memory [`types::DataSet`], rewrites its column labels into
//! safe lowercase snake_case names, and writes the result to `<schema>.<table>`, replacing any
//! existing table of that name. The `ingest-data` binary wraps [`pipeline::run`].
//!
//! ## Column names
//!
//! [`naming::normalize_column_names`] maps each label to a name matching
//! `[a-z0-9]+(_[a-z0-9]+)*`, or `col` when nothing alphanumeric remains:
//!
//! ```rust
//! use tabular_ingest::naming::normalize_column_names;
//!
//! let names = normalize_column_names(["Customer ID", "  Revenue (USD)!! ", "###", "Total $", "Total $"]);
//! assert_eq!(names, ["customer_id", "revenue_usd", "col", "total", "total"]);
//! ```
//!
//! Duplicates are kept by default; [`naming::DuplicateColumns`] selects another policy.
//!
//! ## Identifiers
//!
//! Schema and table names must match `^[A-Za-z_][A-Za-z0-9_]*$`. They are checked by
//! [`naming::validate_identifier`] before the file is read or a connection is opened, and are
//! double-quoted in every statement sent to the database.
//!
//! ```rust
//! use tabular_ingest::naming::{validate_identifier, IdentifierRole};
//!
//! assert!(validate_identifier("transactions_raw", IdentifierRole::Table).is_ok());
//! assert!(validate_identifier("1table", IdentifierRole::Table).is_err());
//! ```
//!
//! ## Running an ingest
//!
//! ```no_run
//! use tabular_ingest::config::Config;
//! use tabular_ingest::pipeline::{run, IngestRequest};
//! use tabular_ingest::sink::PostgresSink;
//!
//! # fn main() -> Result<(), tabular_ingest::IngestError> {
//! let config = Config::from_env()?;
//! let request = IngestRequest::new("transactions.csv");
//! let report = run(&config, &request, PostgresSink::connect)?;
//! println!("Ingested {} rows into {}.{}", report.rows, report.schema, report.table);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`config`]: connection settings resolved from the environment / `.env`
//! - [`naming`]: column-name normalization and identifier validation
//! - [`ingestion`]: CSV and Parquet readers
//! - [`types`]: in-memory table types
//! - [`sink`]: the database side ([`sink::TableSink`], [`sink::PostgresSink`])
//! - [`pipeline`]: the end-to-end run
//! - [`observability`]: run events and the append-only event log
//! - [`logging`]: `tracing` subscriber setup for the binary
//! - [`error`]: the shared error type

pub mod config;
pub mod error;
pub mod ingestion;
pub mod logging;
pub mod naming;
pub mod observability;
pub mod pipeline;
pub mod sink;
pub mod types;

pub use error::{IngestError, IngestResult};
