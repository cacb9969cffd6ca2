//! One ingestion run, start to finish.
//!
//! The run is strictly sequential and every failure is fatal:
//!
//! 1. validate the schema and table identifiers (no I/O yet);
//! 2. read the input file;
//! 3. normalize column names and apply the duplicate policy;
//! 4. connect to the database (first network I/O);
//! 5. ensure the schema exists, then replace the table.
//!
//! Observers on the request hear about the read, then either the load or the failing stage.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{IngestError, IngestResult};
use crate::ingestion::{ingest_from_path, IngestionOptions};
use crate::naming::{
    normalize_column_names, resolve_duplicates, validate_identifier, DuplicateColumns, IdentifierRole,
};
use crate::observability::{RunObserver, RunStage, Severity};
use crate::sink::{TableSink, TableTarget};

/// Default destination schema.
pub const DEFAULT_SCHEMA: &str = "raw";
/// Default destination table.
pub const DEFAULT_TABLE: &str = "transactions_raw";

/// What to ingest and where to put it.
#[derive(Clone)]
pub struct IngestRequest {
    /// Input CSV or Parquet file.
    pub file: PathBuf,
    /// Destination schema name.
    pub schema: String,
    /// Destination table name.
    pub table: String,
    /// Policy for columns that normalize to the same name.
    pub duplicates: DuplicateColumns,
    /// File reading options.
    pub ingestion: IngestionOptions,
    /// Receivers for run events.
    pub observers: Vec<Arc<dyn RunObserver>>,
}

impl fmt::Debug for IngestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestRequest")
            .field("file", &self.file)
            .field("schema", &self.schema)
            .field("table", &self.table)
            .field("duplicates", &self.duplicates)
            .field("ingestion", &self.ingestion)
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl IngestRequest {
    /// Request with default schema/table and options.
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            schema: DEFAULT_SCHEMA.to_owned(),
            table: DEFAULT_TABLE.to_owned(),
            duplicates: DuplicateColumns::default(),
            ingestion: IngestionOptions::default(),
            observers: Vec::new(),
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Input file that was read.
    pub input: PathBuf,
    /// Destination schema.
    pub schema: String,
    /// Destination table.
    pub table: String,
    /// Rows written to the destination table.
    pub rows: u64,
    /// Normalized column names, in order.
    pub columns: Vec<String>,
}

/// Execute one run.
///
/// `connect` is called with the configured connection string only after the identifiers are
/// valid and the file has been read and normalized.
pub fn run<S, C>(config: &Config, request: &IngestRequest, connect: C) -> IngestResult<IngestReport>
where
    S: TableSink,
    C: FnOnce(&str) -> IngestResult<S>,
{
    match run_stages(config, request, connect) {
        Ok(report) => {
            for observer in &request.observers {
                observer.on_loaded(&report);
            }
            Ok(report)
        }
        Err((stage, error)) => {
            let severity = Severity::of(&error);
            debug!(%stage, ?severity, "run failed");
            for observer in &request.observers {
                observer.on_failure(stage, severity, &error);
            }
            Err(error)
        }
    }
}

fn run_stages<S, C>(
    config: &Config,
    request: &IngestRequest,
    connect: C,
) -> Result<IngestReport, (RunStage, IngestError)>
where
    S: TableSink,
    C: FnOnce(&str) -> IngestResult<S>,
{
    let at = |stage: RunStage| move |error: IngestError| (stage, error);

    validate_identifier(&request.schema, IdentifierRole::Schema).map_err(at(RunStage::Validate))?;
    validate_identifier(&request.table, IdentifierRole::Table).map_err(at(RunStage::Validate))?;
    let target = TableTarget::new(request.schema.as_str(), request.table.as_str());

    info!("Reading file: {}", request.file.display());
    let mut data = ingest_from_path(&request.file, &request.ingestion).map_err(at(RunStage::Read))?;
    for observer in &request.observers {
        observer.on_read(&request.file, data.row_count(), data.column_count());
    }

    let names = normalize_column_names(data.schema.field_names());
    let names = resolve_duplicates(names, request.duplicates).map_err(at(RunStage::Normalize))?;
    data.schema.rename(names).map_err(at(RunStage::Normalize))?;

    let mut sink = connect(&config.db_url).map_err(at(RunStage::Connect))?;
    sink.ensure_schema(&target.schema).map_err(at(RunStage::Write))?;

    info!("Ingesting into {target} ...");
    let rows = sink.replace_table(&target, &data).map_err(at(RunStage::Write))?;
    info!(rows, %target, "ingest complete");

    Ok(IngestReport {
        input: request.file.clone(),
        schema: target.schema,
        table: target.table,
        rows,
        columns: data.schema.field_names().map(str::to_owned).collect(),
    })
}
