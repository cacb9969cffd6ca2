//! Destination side of an ingestion run.
//!
//! [`TableSink`] is the narrow contract the pipeline needs from a database: make sure a schema
//! exists, then replace a table with a full snapshot of a [`DataSet`]. [`PostgresSink`] is the
//! production implementation.

pub mod postgres;

use std::fmt;

use crate::error::IngestResult;
use crate::naming::quote_identifier;
use crate::types::DataSet;

pub use self::postgres::PostgresSink;

/// Schema-qualified destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableTarget {
    /// Destination schema name.
    pub schema: String,
    /// Destination table name.
    pub table: String,
}

impl TableTarget {
    /// Create a new target.
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
        }
    }

    /// `"schema"."table"`, quoted for SQL.
    pub fn quoted(&self) -> String {
        format!("{}.{}", quote_identifier(&self.schema), quote_identifier(&self.table))
    }
}

impl fmt::Display for TableTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// A database able to receive a full table snapshot.
pub trait TableSink {
    /// Create `schema` if it does not already exist.
    fn ensure_schema(&mut self, schema: &str) -> IngestResult<()>;

    /// Drop `target` if it exists, recreate it from `data.schema`, and write every row.
    ///
    /// Returns the number of rows written.
    fn replace_table(&mut self, target: &TableTarget, data: &DataSet) -> IngestResult<u64>;
}
