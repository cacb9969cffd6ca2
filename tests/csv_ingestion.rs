use tabular_ingest::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader};
use tabular_ingest::types::{DataType, Value};

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes())
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let ds = ingest_csv_from_path("tests/fixtures/transactions.csv").unwrap();

    assert_eq!(ds.row_count(), 3);
    assert_eq!(
        ds.schema.field_names().collect::<Vec<_>>(),
        vec!["Customer ID", "Total $", "Total $", "Paid?", "  Revenue (USD)!! ", "###"]
    );
    assert_eq!(
        ds.rows[0],
        vec![
            Value::Int64(1),
            Value::Float64(10.5),
            Value::Int64(11),
            Value::Bool(true),
            Value::Int64(100),
            Value::Utf8("a".to_string()),
        ]
    );
}

#[test]
fn ingest_csv_infers_column_types() {
    let ds = ingest_csv_from_path("tests/fixtures/transactions.csv").unwrap();
    let types: Vec<DataType> = ds.schema.fields.iter().map(|f| f.data_type).collect();
    assert_eq!(
        types,
        vec![
            DataType::Int64,
            DataType::Float64,
            DataType::Int64,
            DataType::Bool,
            DataType::Int64,
            DataType::Utf8,
        ]
    );
    // Integers in a float column are widened, not rejected.
    assert_eq!(ds.rows[1][1], Value::Float64(20.0));
}

#[test]
fn ingest_csv_maps_empty_cells_to_null() {
    let ds = ingest_csv_from_path("tests/fixtures/transactions.csv").unwrap();
    assert_eq!(ds.rows[2][1], Value::Null);
    assert_eq!(ds.rows[1][4], Value::Null);
    assert_eq!(ds.rows[2][5], Value::Null);
}

#[test]
fn ingest_csv_mixed_column_falls_back_to_text() {
    let mut rdr = reader("code,flag\n1,true\nA7,0\n");
    let ds = ingest_csv_from_reader(&mut rdr).unwrap();

    assert_eq!(ds.schema.fields[0].data_type, DataType::Utf8);
    assert_eq!(ds.schema.fields[1].data_type, DataType::Utf8);
    assert_eq!(ds.rows[0][0], Value::Utf8("1".to_string()));
    assert_eq!(ds.rows[1][1], Value::Utf8("0".to_string()));
}

#[test]
fn ingest_csv_header_only_file_has_no_rows() {
    let mut rdr = reader("a,b\n");
    let ds = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(ds.row_count(), 0);
    assert_eq!(ds.column_count(), 2);
    assert_eq!(ds.schema.fields[0].data_type, DataType::Utf8);
}

#[test]
fn ingest_csv_errors_on_ragged_rows() {
    let mut rdr = reader("a,b\n1,2\n3\n");
    let err = ingest_csv_from_reader(&mut rdr).unwrap_err();
    assert!(err.to_string().contains("csv error"));
}

#[test]
fn ingest_csv_keeps_whitespace_only_cells_as_text() {
    let mut rdr = reader("name\nalice\n   \n");
    let ds = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(ds.rows[1][0], Value::Utf8("   ".to_string()));

    // A blank-looking cell also makes an otherwise numeric column text.
    let mut rdr = reader("id,amount\n1,10\n2, \n");
    let ds = ingest_csv_from_reader(&mut rdr).unwrap();
    assert_eq!(ds.schema.fields[1].data_type, DataType::Utf8);
    assert_eq!(ds.rows[1][1], Value::Utf8(" ".to_string()));
    assert_eq!(ds.rows[0][1], Value::Utf8("10".to_string()));
}
