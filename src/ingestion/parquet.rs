//! Parquet ingestion implementation.

use std::path::Path;

use parquet::basic::{ConvertedType, Repetition, Type as PhysicalType};
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;
use parquet::schema::types::Type;

use crate::error::{IngestError, IngestResult};
use crate::types::{self, DataSet, DataType, Schema, Value};

/// Ingest a Parquet file into an in-memory `DataSet`.
///
/// Notes:
/// - Every top-level field of the file schema becomes one column, in file order
/// - Column types come from the file schema, so all-null columns and empty files keep them
/// - Uses the Parquet record API (`RowIter`); values the in-memory model has no type for
///   (dates, timestamps, decimals, binary, nested groups) are kept as their display text
pub fn ingest_parquet_from_path(path: impl AsRef<Path>) -> IngestResult<DataSet> {
    let reader = SerializedFileReader::try_from(path.as_ref())?;
    let schema = file_schema(&reader);

    let mut rows: Vec<Vec<Value>> = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        let mut out_row: Vec<Value> = Vec::with_capacity(schema.fields.len());
        for ((name, field), column) in row.get_column_iter().zip(&schema.fields) {
            let value = convert_parquet_field(row_num, name, field)?;
            out_row.push(value.coerce(column.data_type));
        }
        if row.len() != schema.fields.len() {
            return Err(IngestError::SchemaMismatch {
                message: format!(
                    "row {row_num} has {} columns, file schema has {}",
                    row.len(),
                    schema.fields.len()
                ),
            });
        }
        rows.push(out_row);
    }

    Ok(DataSet::new(schema, rows))
}

fn file_schema<R: ChunkReader + 'static>(reader: &SerializedFileReader<R>) -> Schema {
    let fields = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .root_schema()
        .get_fields()
        .iter()
        .map(|f| types::Field::new(f.name(), column_type(f)))
        .collect();
    Schema::new(fields)
}

/// Column type for a top-level schema field, matching what the record API yields for it.
fn column_type(field: &Type) -> DataType {
    let info = field.get_basic_info();
    if !field.is_primitive() || (info.has_repetition() && info.repetition() == Repetition::REPEATED) {
        return DataType::Utf8;
    }
    match (field.get_physical_type(), info.converted_type()) {
        (PhysicalType::BOOLEAN, _) => DataType::Bool,
        (
            PhysicalType::INT32,
            ConvertedType::NONE
            | ConvertedType::INT_8
            | ConvertedType::INT_16
            | ConvertedType::INT_32
            | ConvertedType::UINT_8
            | ConvertedType::UINT_16
            | ConvertedType::UINT_32,
        ) => DataType::Int64,
        (PhysicalType::INT64, ConvertedType::NONE | ConvertedType::INT_64 | ConvertedType::UINT_64) => {
            DataType::Int64
        }
        (PhysicalType::FLOAT | PhysicalType::DOUBLE, _) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

fn convert_parquet_field(row: usize, column: &str, f: &Field) -> IngestResult<Value> {
    let value = match f {
        Field::Null => Value::Null,
        Field::Bool(b) => Value::Bool(*b),
        Field::Byte(v) => Value::Int64(i64::from(*v)),
        Field::Short(v) => Value::Int64(i64::from(*v)),
        Field::Int(v) => Value::Int64(i64::from(*v)),
        Field::Long(v) => Value::Int64(*v),
        Field::UByte(v) => Value::Int64(i64::from(*v)),
        Field::UShort(v) => Value::Int64(i64::from(*v)),
        Field::UInt(v) => Value::Int64(i64::from(*v)),
        Field::ULong(v) => {
            i64::try_from(*v)
                .map(Value::Int64)
                .map_err(|_| IngestError::ParseError {
                    row,
                    column: column.to_string(),
                    raw: f.to_string(),
                    message: "u64 out of range for i64".to_string(),
                })?
        }
        Field::Float(v) => Value::Float64(f64::from(*v)),
        Field::Double(v) => Value::Float64(*v),
        Field::Str(s) => Value::Utf8(s.clone()),
        other => Value::Utf8(other.to_string()),
    };
    Ok(value)
}
