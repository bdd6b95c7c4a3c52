// In: src/staging/mod.rs

//! Batch staging: from caller-provided rows to arena-backed, sorted tables.
//!
//! `WriterData` holds what the caller appended, unvalidated against the store but
//! checked for shape. `StagedTables::index` groups those rows per table, copying
//! blob and string cells into the writer's `BlobArena`, and each `StagedTable` can
//! then be sorted and borrowed as a `PushTable` descriptor.

use std::collections::BTreeMap;

use crate::arena::BlobArena;
use crate::error::IngestError;
use crate::types::{TableSchema, Timespec};

mod column;
mod staged_table;

pub use self::column::ColumnValues;
pub use self::staged_table::StagedTable;

//==================================================================================
// 1. Writer Data
//==================================================================================

/// One `append` call: a table, its index and one entry per schema column.
#[derive(Debug, Clone, PartialEq)]
pub struct WriterDataEntry {
    pub schema: TableSchema,
    pub index: Vec<Timespec>,
    /// `None` means the whole column is null.
    pub columns: Vec<Option<ColumnValues>>,
}

/// The rows a caller wants pushed in one batch, possibly spanning several tables.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriterData {
    entries: Vec<WriterDataEntry>,
}

impl WriterData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds rows for `schema`.
    ///
    /// Data must be provided for every column of the table, and every column must be
    /// exactly as long as `index`.
    pub fn append(
        &mut self,
        schema: &TableSchema,
        index: Vec<Timespec>,
        columns: Vec<Option<ColumnValues>>,
    ) -> Result<(), IngestError> {
        if columns.len() != schema.column_count() {
            return Err(IngestError::InvalidArgument(format!(
                "data must be provided for every column of table '{}': expected {}, got {}",
                schema.name,
                schema.column_count(),
                columns.len()
            )));
        }

        for (values, info) in columns.iter().zip(&schema.columns) {
            if let Some(values) = values {
                if values.len() != index.len() {
                    return Err(IngestError::InvalidArgument(format!(
                        "column '{}' has {} values, but the index has {}: every data array \
                         should be exactly the same length as the index array",
                        info.name,
                        values.len(),
                        index.len()
                    )));
                }
            }
        }

        self.entries.push(WriterDataEntry {
            schema: schema.clone(),
            index,
            columns,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[WriterDataEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//==================================================================================
// 2. Staged Tables
//==================================================================================

/// Staged tables keyed, and therefore pushed, in table-name order.
#[derive(Debug, Clone, Default)]
pub struct StagedTables {
    tables: BTreeMap<String, StagedTable>,
}

impl StagedTables {
    /// Stages every entry of `data`, interning blob and string cells into `arena`.
    ///
    /// Appends that target the same table are concatenated in append order.
    pub fn index(data: &WriterData, arena: &mut BlobArena) -> Result<Self, IngestError> {
        let mut tables: BTreeMap<String, StagedTable> = BTreeMap::new();

        for entry in data.entries() {
            let table = tables
                .entry(entry.schema.name.clone())
                .or_insert_with(|| StagedTable::new(entry.schema.clone()));

            if table.schema() != &entry.schema {
                return Err(IngestError::InvalidArgument(format!(
                    "table '{}' was appended with two different column layouts",
                    entry.schema.name
                )));
            }
            table.append(&entry.index, &entry.columns, arena)?;
        }

        Ok(Self { tables })
    }

    pub fn get(&self, name: &str) -> Option<&StagedTable> {
        self.tables.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StagedTable> {
        self.tables.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut StagedTable> {
        self.tables.values_mut()
    }

    pub fn sort_by_index(&mut self) {
        for table in self.iter_mut() {
            table.sort_by_index();
        }
    }
}
