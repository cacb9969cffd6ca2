//! PostgreSQL sink built on the blocking `postgres` client.
//!
//! A table replace runs as one transaction: `DROP TABLE IF EXISTS`, `CREATE TABLE`, then a
//! binary `COPY ... FROM STDIN` of every row. Identifiers are always double-quoted, on top of
//! the bareword validation done by the pipeline.

use std::error::Error as StdError;

use bytes::BytesMut;
use postgres::binary_copy::BinaryCopyInWriter;
use postgres::types::{to_sql_checked, IsNull, ToSql, Type};
use postgres::{Client, NoTls};
use tracing::debug;

use crate::error::IngestResult;
use crate::naming::quote_identifier;
use crate::types::{DataSet, DataType, Schema, Value};

use super::{TableSink, TableTarget};

/// A [`TableSink`] writing to PostgreSQL over a single connection.
pub struct PostgresSink {
    client: Client,
}

impl PostgresSink {
    /// Connect using a libpq-style connection string or `postgresql://` URL.
    pub fn connect(db_url: &str) -> IngestResult<Self> {
        let client = Client::connect(db_url, NoTls)?;
        Ok(Self { client })
    }
}

impl TableSink for PostgresSink {
    fn ensure_schema(&mut self, schema: &str) -> IngestResult<()> {
        let sql = create_schema_sql(schema);
        debug!(%sql, "ensuring schema");
        let mut tx = self.client.transaction()?;
        tx.batch_execute(&sql)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_table(&mut self, target: &TableTarget, data: &DataSet) -> IngestResult<u64> {
        let drop_sql = drop_table_sql(target);
        let create_sql = create_table_sql(target, &data.schema);
        let copy_sql = copy_in_sql(target, &data.schema);
        let types: Vec<Type> = data
            .schema
            .fields
            .iter()
            .map(|f| postgres_type(f.data_type))
            .collect();

        let mut tx = self.client.transaction()?;
        debug!(sql = %drop_sql, "dropping table");
        tx.batch_execute(&drop_sql)?;
        debug!(sql = %create_sql, "creating table");
        tx.batch_execute(&create_sql)?;

        debug!(sql = %copy_sql, rows = data.row_count(), "copying rows");
        let copy = tx.copy_in(copy_sql.as_str())?;
        let mut writer = BinaryCopyInWriter::new(copy, &types);
        for row in &data.rows {
            let params: Vec<&(dyn ToSql + Sync)> =
                row.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
            writer.write(&params)?;
        }
        let written = writer.finish()?;

        tx.commit()?;
        Ok(written)
    }
}

/// `CREATE SCHEMA IF NOT EXISTS "<schema>"`.
pub fn create_schema_sql(schema: &str) -> String {
    format!("CREATE SCHEMA IF NOT EXISTS {}", quote_identifier(schema))
}

/// `DROP TABLE IF EXISTS "<schema>"."<table>"`.
pub fn drop_table_sql(target: &TableTarget) -> String {
    format!("DROP TABLE IF EXISTS {}", target.quoted())
}

/// `CREATE TABLE` with one quoted column per field.
pub fn create_table_sql(target: &TableTarget, schema: &Schema) -> String {
    let columns = schema
        .fields
        .iter()
        .map(|f| format!("{} {}", quote_identifier(&f.name), f.data_type.postgres_type()))
        .collect::<Vec<_>>()
        .join(", ");
    format!("CREATE TABLE {} ({columns})", target.quoted())
}

/// Binary `COPY ... FROM STDIN` for every field, in schema order.
pub fn copy_in_sql(target: &TableTarget, schema: &Schema) -> String {
    if schema.fields.is_empty() {
        return format!("COPY {} FROM STDIN (FORMAT binary)", target.quoted());
    }
    let columns = schema
        .field_names()
        .map(quote_identifier)
        .collect::<Vec<_>>()
        .join(", ");
    format!("COPY {} ({columns}) FROM STDIN (FORMAT binary)", target.quoted())
}

fn postgres_type(data_type: DataType) -> Type {
    match data_type {
        DataType::Int64 => Type::INT8,
        DataType::Float64 => Type::FLOAT8,
        DataType::Bool => Type::BOOL,
        DataType::Utf8 => Type::TEXT,
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        match self {
            Value::Null => Ok(IsNull::Yes),
            Value::Int64(v) if *ty == Type::INT8 => v.to_sql(ty, out),
            Value::Float64(v) if *ty == Type::FLOAT8 => v.to_sql(ty, out),
            Value::Bool(v) if *ty == Type::BOOL => v.to_sql(ty, out),
            Value::Utf8(v) if *ty == Type::TEXT => v.as_str().to_sql(ty, out),
            other => Err(format!("cannot encode {other:?} as {ty}").into()),
        }
    }

    fn accepts(ty: &Type) -> bool {
        [Type::INT8, Type::FLOAT8, Type::BOOL, Type::TEXT].contains(ty)
    }

    to_sql_checked!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Field;

    fn sample_schema() -> Schema {
        Schema::new(vec![
            Field::new("customer_id", DataType::Int64),
            Field::new("total", DataType::Float64),
            Field::new("note", DataType::Utf8),
            Field::new("active", DataType::Bool),
        ])
    }

    #[test]
    fn schema_ddl_is_quoted() {
        assert_eq!(create_schema_sql("raw"), "CREATE SCHEMA IF NOT EXISTS \"raw\"");
    }

    #[test]
    fn drop_and_create_table_ddl() {
        let target = TableTarget::new("raw", "transactions_raw");
        assert_eq!(
            drop_table_sql(&target),
            "DROP TABLE IF EXISTS \"raw\".\"transactions_raw\""
        );
        assert_eq!(
            create_table_sql(&target, &sample_schema()),
            "CREATE TABLE \"raw\".\"transactions_raw\" (\"customer_id\" BIGINT, \"total\" DOUBLE PRECISION, \"note\" TEXT, \"active\" BOOLEAN)"
        );
    }

    #[test]
    fn copy_sql_lists_columns_in_order() {
        let target = TableTarget::new("raw", "t");
        assert_eq!(
            copy_in_sql(&target, &sample_schema()),
            "COPY \"raw\".\"t\" (\"customer_id\", \"total\", \"note\", \"active\") FROM STDIN (FORMAT binary)"
        );
        assert_eq!(
            copy_in_sql(&target, &Schema::new(Vec::new())),
            "COPY \"raw\".\"t\" FROM STDIN (FORMAT binary)"
        );
    }

    #[test]
    fn value_encoding_checks_column_type() {
        let mut buf = BytesMut::new();
        assert!(matches!(
            Value::Null.to_sql(&Type::INT8, &mut buf).unwrap(),
            IsNull::Yes
        ));
        assert!(matches!(
            Value::Int64(5).to_sql(&Type::INT8, &mut buf).unwrap(),
            IsNull::No
        ));
        assert_eq!(buf.len(), 8);
        assert!(Value::Int64(5).to_sql(&Type::FLOAT8, &mut buf).is_err());
        assert!(<Value as ToSql>::accepts(&Type::TEXT));
        assert!(!<Value as ToSql>::accepts(&Type::JSONB));
    }
}
