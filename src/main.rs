//! `ingest-data`: load a CSV or Parquet file into PostgreSQL.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tabular_ingest::config::Config;
use tabular_ingest::ingestion::IngestionOptions;
use tabular_ingest::logging::{LogConfig, init_logging};
use tabular_ingest::observability::{FileObserver, RunObserver};
use tabular_ingest::pipeline::{self, IngestReport, IngestRequest};
use tabular_ingest::sink::PostgresSink;

mod cli;

use crate::cli::Cli;

fn main() {
    let cli = Cli::parse();
    init_logging(&log_config_from_cli(&cli));

    if let Err(error) = run(&cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Configuration errors surface before the input file is touched.
    let config = Config::from_env()?;
    let request = request_from_cli(cli);

    let report = pipeline::run(&config, &request, PostgresSink::connect)?;
    print_report(&report, cli.json)?;
    Ok(())
}

fn request_from_cli(cli: &Cli) -> IngestRequest {
    let observers: Vec<Arc<dyn RunObserver>> = cli
        .event_log
        .iter()
        .map(|path| Arc::new(FileObserver::new(path)) as Arc<dyn RunObserver>)
        .collect();

    IngestRequest {
        file: cli.file.clone(),
        schema: cli.schema.clone(),
        table: cli.table.clone(),
        duplicates: cli.on_duplicate.into(),
        ingestion: IngestionOptions {
            format: cli.format.map(Into::into),
        },
        observers,
    }
}

fn print_report(report: &IngestReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!(
            "Ingested {} rows from {} into {}.{}",
            report.rows,
            report.input.display(),
            report.schema,
            report.table
        );
    }
    Ok(())
}

fn log_config_from_cli(cli: &Cli) -> LogConfig {
    LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        format: cli.log_format.into(),
        with_ansi: io::stderr().is_terminal(),
        use_env_filter: !cli.verbosity.is_present(),
    }
}
