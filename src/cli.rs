//! CLI argument definitions for `ingest-data`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use tabular_ingest::ingestion::IngestionFormat;
use tabular_ingest::logging::LogFormat;
use tabular_ingest::naming::DuplicateColumns;
use tabular_ingest::pipeline::{DEFAULT_SCHEMA, DEFAULT_TABLE};

#[derive(Parser, Debug)]
#[command(
    name = "ingest-data",
    version,
    about = "Ingest a CSV or Parquet file into a PostgreSQL table",
    long_about = "Read a .csv or .parquet file, normalize its column names to lowercase \
                  snake_case, and write it to <schema>.<table>, replacing any existing table.\n\n\
                  The connection string is read from DB_URL (a local .env file is loaded first)."
)]
pub struct Cli {
    /// Path to input file (.parquet or .csv).
    #[arg(short = 'f', long = "file", value_name = "PATH")]
    pub file: PathBuf,

    /// Read the file as this format instead of going by its extension.
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Target schema.
    #[arg(long, default_value = DEFAULT_SCHEMA)]
    pub schema: String,

    /// Target table name.
    #[arg(long, default_value = DEFAULT_TABLE)]
    pub table: String,

    /// What to do when distinct columns normalize to the same name.
    #[arg(long = "on-duplicate", value_enum, default_value = "allow")]
    pub on_duplicate: DuplicateArg,

    /// Append run events (file read, table loaded, failing stage) to this file.
    #[arg(long = "event-log", value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Print the run summary as JSON on stdout.
    #[arg(long)]
    pub json: bool,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty")]
    pub log_format: LogFormatArg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for IngestionFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => Self::Csv,
            FormatArg::Parquet => Self::Parquet,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum DuplicateArg {
    /// Keep duplicate names (the database may reject them).
    Allow,
    /// Rename later duplicates to name_2, name_3, ...
    Suffix,
    /// Fail before connecting to the database.
    Error,
}

impl From<DuplicateArg> for DuplicateColumns {
    fn from(arg: DuplicateArg) -> Self {
        match arg {
            DuplicateArg::Allow => Self::Allow,
            DuplicateArg::Suffix => Self::Suffix,
            DuplicateArg::Error => Self::Error,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
