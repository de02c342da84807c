//! Record metadata.
//!
//! [`RecordMetadata`] describes the shape of a row: an ordered list of typed
//! columns and an optional designated timestamp column. Table schemas
//! ([`GenericRecordMetadata`]) and merged join schemas both expose it, so
//! one can be copied into the other.

pub mod errors;
mod generic;
mod registry;

pub use errors::MetadataError;
pub use generic::GenericRecordMetadata;
pub use registry::ColumnRegistry;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel for "no column" in index-returning lookups.
pub const NO_COLUMN: i32 = -1;

/// Column value types known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColumnType {
    Boolean,
    Byte,
    Short,
    Char,
    Int,
    Long,
    Date,
    Timestamp,
    Float,
    Double,
    String,
    Symbol,
    Long256,
    Uuid,
    Binary,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::Byte => "BYTE",
            ColumnType::Short => "SHORT",
            ColumnType::Char => "CHAR",
            ColumnType::Int => "INT",
            ColumnType::Long => "LONG",
            ColumnType::Date => "DATE",
            ColumnType::Timestamp => "TIMESTAMP",
            ColumnType::Float => "FLOAT",
            ColumnType::Double => "DOUBLE",
            ColumnType::String => "STRING",
            ColumnType::Symbol => "SYMBOL",
            ColumnType::Long256 => "LONG256",
            ColumnType::Uuid => "UUID",
            ColumnType::Binary => "BINARY",
        };
        f.write_str(name)
    }
}

/// Name and type of a single column. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumnMetadata {
    name: String,
    #[serde(rename = "type")]
    column_type: ColumnType,
}

impl TableColumnMetadata {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        TableColumnMetadata {
            name: name.into(),
            column_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }
}

/// Serializable view of a record's metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataSnapshot {
    pub columns: Vec<TableColumnMetadata>,
    pub timestamp_index: i32,
}

impl MetadataSnapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Schema of a row: ordered, typed columns plus an optional timestamp column.
pub trait RecordMetadata {
    fn columns(&self) -> &[TableColumnMetadata];

    /// Index of the designated timestamp column, or [`NO_COLUMN`].
    fn timestamp_index(&self) -> i32;

    /// Index of the column called `name`, or [`NO_COLUMN`] when the name
    /// does not resolve to exactly one column.
    fn column_index_quiet(&self, name: &str) -> i32;

    fn column_count(&self) -> usize {
        self.columns().len()
    }

    fn column(&self, index: usize) -> Option<&TableColumnMetadata> {
        self.columns().get(index)
    }

    /// # Panics
    /// Panics if `index` is out of range.
    fn column_name(&self, index: usize) -> &str {
        self.columns()[index].name()
    }

    /// # Panics
    /// Panics if `index` is out of range.
    fn column_type(&self, index: usize) -> ColumnType {
        self.columns()[index].column_type()
    }

    fn column_index(&self, name: &str) -> Result<usize, MetadataError> {
        usize::try_from(self.column_index_quiet(name)).map_err(|_| MetadataError::InvalidColumn {
            name: name.to_string(),
        })
    }

    fn timestamp_column(&self) -> Option<&TableColumnMetadata> {
        usize::try_from(self.timestamp_index())
            .ok()
            .and_then(|index| self.column(index))
    }

    fn to_snapshot(&self) -> MetadataSnapshot {
        MetadataSnapshot {
            columns: self.columns().to_vec(),
            timestamp_index: self.timestamp_index(),
        }
    }
}
