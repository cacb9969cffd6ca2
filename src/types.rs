//! In-memory table types produced by the file readers and consumed by the database sink.
//!
//! A [`DataSet`] is a [`Schema`] (ordered, typed [`Field`]s) plus row-major [`Value`] storage.
//! Column types are inferred by the readers; see [`crate::ingestion`].

use std::fmt;

use crate::error::{IngestError, IngestResult};

/// Logical data type for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 64-bit signed integer.
    Int64,
    /// 64-bit floating point number.
    Float64,
    /// Boolean.
    Bool,
    /// UTF-8 string.
    Utf8,
}

impl DataType {
    /// PostgreSQL column type used when creating the destination table.
    pub fn postgres_type(self) -> &'static str {
        match self {
            Self::Int64 => "BIGINT",
            Self::Float64 => "DOUBLE PRECISION",
            Self::Bool => "BOOLEAN",
            Self::Utf8 => "TEXT",
        }
    }

    /// Narrowest type able to hold values of both `self` and `other`.
    ///
    /// Integers widen to floats; any other mix falls back to text.
    pub fn unify(self, other: Self) -> Self {
        match (self, other) {
            (a, b) if a == b => a,
            (Self::Int64, Self::Float64) | (Self::Float64, Self::Int64) => Self::Float64,
            _ => Self::Utf8,
        }
    }
}

/// A single named, typed column in a [`Schema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name.
    pub name: String,
    /// Column data type.
    pub data_type: DataType,
}

impl Field {
    /// Create a new field.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
        }
    }
}

/// Ordered list of fields describing the shape of a [`DataSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Ordered list of fields.
    pub fields: Vec<Field>,
}

impl Schema {
    /// Create a new schema from fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    /// Iterate field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Replace field names positionally, keeping types.
    pub fn rename(&mut self, names: Vec<String>) -> IngestResult<()> {
        if names.len() != self.fields.len() {
            return Err(IngestError::SchemaMismatch {
                message: format!(
                    "cannot rename {} columns with {} names",
                    self.fields.len(),
                    names.len()
                ),
            });
        }
        for (field, name) in self.fields.iter_mut().zip(names) {
            field.name = name;
        }
        Ok(())
    }
}

/// A single typed value in a [`DataSet`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Convert for a column of type `target`: ints widen to floats and text columns take the display form.
    pub fn coerce(self, target: DataType) -> Self {
        match (self, target) {
            (Self::Int64(v), DataType::Float64) => Self::Float64(v as f64),
            (Self::Utf8(s), DataType::Utf8) => Self::Utf8(s),
            (v @ Self::Null, _) => v,
            (v, DataType::Utf8) => Self::Utf8(v.to_string()),
            (v, _) => v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Utf8(v) => f.write_str(v),
        }
    }
}

/// In-memory tabular dataset.
///
/// Rows are stored as `Vec<Vec<Value>>` in the same order as the [`Schema`] fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    /// Schema describing row shape.
    pub schema: Schema,
    /// Row-major value storage.
    pub rows: Vec<Vec<Value>>,
}

impl DataSet {
    /// Create a dataset from schema and rows.
    pub fn new(schema: Schema, rows: Vec<Vec<Value>>) -> Self {
        Self { schema, rows }
    }

    /// Number of rows in the dataset.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns in the dataset.
    pub fn column_count(&self) -> usize {
        self.schema.fields.len()
    }
}
