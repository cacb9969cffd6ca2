use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use tabular_ingest::IngestError;
use tabular_ingest::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions};
use tabular_ingest::types::Value;

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("tabular-ingest-unified-{nanos}.{ext}"))
}

#[test]
fn unified_csv_auto_detect() {
    let ds = ingest_from_path("tests/fixtures/transactions.csv", &IngestionOptions::default()).unwrap();
    assert_eq!(ds.row_count(), 3);
    assert_eq!(ds.rows[0][0], Value::Int64(1));
}

#[test]
fn unified_extension_is_case_insensitive() {
    let path = tmp_file("CSV");
    std::fs::write(&path, "a,b\n1,x\n").unwrap();

    let ds = ingest_from_path(&path, &IngestionOptions::default()).unwrap();
    assert_eq!(ds.rows[0], vec![Value::Int64(1), Value::Utf8("x".to_string())]);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn unified_rejects_unsupported_extension() {
    let err = ingest_from_path("tests/fixtures/notes.txt", &IngestionOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains("use .parquet or .csv"));
}

#[test]
fn unified_missing_file_is_not_found_before_format_check() {
    let err = ingest_from_path("tests/fixtures/missing.txt", &IngestionOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::InputNotFound { .. }));
    assert!(err.to_string().contains("input file not found"));
}

#[test]
fn unified_forced_format_overrides_extension() {
    let path = tmp_file("dat");
    std::fs::write(&path, "id\n7\n").unwrap();

    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
    };
    let ds = ingest_from_path(&path, &opts).unwrap();
    assert_eq!(ds.rows, vec![vec![Value::Int64(7)]]);

    let _ = std::fs::remove_file(&path);
}
