//! Run events: what a run read, what it loaded, and where it failed.
//!
//! [`crate::pipeline::run`] reports to every [`RunObserver`] on the request. A run ends with
//! exactly one of `on_loaded` or `on_failure`, so an event log never claims success for a
//! run whose database write failed.

use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestError;
use crate::pipeline::IngestReport;

/// Step of a run an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    /// Schema and table identifier checks.
    Validate,
    /// Reading the input file.
    Read,
    /// Column name normalization and the duplicate policy.
    Normalize,
    /// Opening the database connection.
    Connect,
    /// Creating the schema and replacing the table.
    Write,
}

impl fmt::Display for RunStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Validate => "validate",
            Self::Read => "read",
            Self::Normalize => "normalize",
            Self::Connect => "connect",
            Self::Write => "write",
        })
    }
}

/// How bad a failed run is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The input or the request was rejected; fixing the data or arguments fixes the run.
    Error,
    /// The environment failed: unreadable input, lost or refused database connection.
    Critical,
}

impl Severity {
    /// Classify a run failure.
    pub fn of(error: &IngestError) -> Self {
        match error {
            IngestError::InputNotFound { .. } | IngestError::Io(_) => Self::Critical,
            IngestError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Self::Critical,
                _ => Self::Error,
            },
            // Parquet errors wrap I/O only through the source chain.
            IngestError::Parquet(err) if error_chain_contains_io(err) => Self::Critical,
            // A server-side rejection (e.g. duplicate column) is a data problem.
            IngestError::Database(err) if err.as_db_error().is_some() => Self::Error,
            IngestError::Database(_) => Self::Critical,
            _ => Self::Error,
        }
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

/// Receives run events.
pub trait RunObserver: Send + Sync {
    /// The input file was read.
    fn on_read(&self, _path: &Path, _rows: usize, _columns: usize) {}

    /// The table was replaced; the run succeeded.
    fn on_loaded(&self, _report: &IngestReport) {}

    /// The run failed at `stage`.
    fn on_failure(&self, _stage: RunStage, _severity: Severity, _error: &IngestError) {}
}

/// Appends run events to a local log file, one line each.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Append events to `path`, creating it if needed.
    ///
    /// Writes are best-effort; a log file that cannot be opened never fails the run.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{} {line}", unix_ts());
        }
    }
}

impl RunObserver for FileObserver {
    fn on_read(&self, path: &Path, rows: usize, columns: usize) {
        self.append_line(&format!(
            "read path={} rows={rows} columns={columns}",
            path.display()
        ));
    }

    fn on_loaded(&self, report: &IngestReport) {
        self.append_line(&format!(
            "loaded target={}.{} rows={} input={}",
            report.schema,
            report.table,
            report.rows,
            report.input.display()
        ));
    }

    fn on_failure(&self, stage: RunStage, severity: Severity, error: &IngestError) {
        self.append_line(&format!("fail stage={stage} severity={severity:?} err={error}"));
    }
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
