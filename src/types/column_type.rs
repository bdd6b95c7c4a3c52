//! This module defines the canonical, type-safe representation of the column
//! types a table can hold, and the table schemas built from them.

use crate::error::IngestError;
use arrow_schema::{DataType as ArrowDataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The column types of the remote store.
///
/// Symbol columns carry string data on the wire; they only differ server-side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Int64,
    Double,
    Timestamp,
    Blob,
    String,
    Symbol,
}

impl ColumnType {
    /// Maps an Arrow `DataType` onto the column type that can store it.
    pub fn from_arrow_type(arrow_type: &ArrowDataType) -> Result<Self, IngestError> {
        match arrow_type {
            ArrowDataType::Int64 => Ok(Self::Int64),
            ArrowDataType::Float64 => Ok(Self::Double),
            ArrowDataType::Timestamp(TimeUnit::Nanosecond, _) => Ok(Self::Timestamp),
            ArrowDataType::Binary | ArrowDataType::LargeBinary => Ok(Self::Blob),
            ArrowDataType::Utf8 | ArrowDataType::LargeUtf8 => Ok(Self::String),
            dt => Err(IngestError::IncompatibleType(format!(
                "Cannot map Arrow type {:?} to a column type",
                dt
            ))),
        }
    }

    /// Returns `true` if cells of this type are interned into the blob arena.
    pub fn is_blob_like(&self) -> bool {
        matches!(self, Self::Blob | Self::String | Self::Symbol)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Name and type of a single table column.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

/// The layout of a table: its name and its ordered columns.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name: String,
    pub columns: Vec<ColumnInfo>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<ColumnInfo>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == column)
    }
}
