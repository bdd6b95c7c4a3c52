// In: src/push/testing.rs

//! A test double for the remote batch-push entry point.

use std::sync::Mutex;

use super::{BatchOptions, BatchPushEndpoint, ColumnData, PushTable, Status};
use crate::config::DeduplicationMode;
use crate::types::{TableSchema, TimeRange, Timespec};

/// An owned snapshot of one table as it reached the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedTable {
    pub name: String,
    pub timestamps: Vec<Timespec>,
    pub columns: Vec<(String, RecordedColumn)>,
    pub truncate_ranges: Vec<TimeRange>,
    pub deduplication_mode: DeduplicationMode,
    pub where_duplicate: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordedColumn {
    Int64(Vec<i64>),
    Double(Vec<f64>),
    Timestamp(Vec<Timespec>),
    Blob(Vec<Option<Vec<u8>>>),
    String(Vec<Option<Vec<u8>>>),
}

impl From<&ColumnData<'_>> for RecordedColumn {
    fn from(data: &ColumnData<'_>) -> Self {
        let owned = |cells: &Vec<Option<&[u8]>>| -> Vec<Option<Vec<u8>>> {
            cells.iter().map(|cell| cell.map(<[u8]>::to_vec)).collect()
        };
        match data {
            ColumnData::Int64(values) => RecordedColumn::Int64(values.to_vec()),
            ColumnData::Double(values) => RecordedColumn::Double(values.to_vec()),
            ColumnData::Timestamp(values) => RecordedColumn::Timestamp(values.to_vec()),
            ColumnData::Blob(cells) => RecordedColumn::Blob(owned(cells)),
            ColumnData::String(cells) => RecordedColumn::String(owned(cells)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub options: BatchOptions,
    pub table_count: usize,
    pub tables: Vec<RecordedTable>,
    pub with_schemas: bool,
}

/// Records every call and answers each with a fixed status.
#[derive(Debug)]
pub struct RecordingEndpoint {
    status: Status,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingEndpoint {
    pub fn returning(status: Status) -> Self {
        Self {
            status,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl BatchPushEndpoint for RecordingEndpoint {
    fn batch_push_with_options(
        &self,
        options: &BatchOptions,
        tables: &[PushTable<'_>],
        schemas: Option<&[TableSchema]>,
    ) -> Status {
        let tables = tables
            .iter()
            .map(|table| RecordedTable {
                name: table.name.to_string(),
                timestamps: table.data.timestamps.to_vec(),
                columns: table
                    .data
                    .columns
                    .iter()
                    .map(|column| (column.name.to_string(), RecordedColumn::from(&column.data)))
                    .collect(),
                truncate_ranges: table.truncate_ranges.clone(),
                deduplication_mode: table.deduplication_mode,
                where_duplicate: table.where_duplicate.to_vec(),
            })
            .collect::<Vec<_>>();

        self.calls.lock().unwrap().push(RecordedCall {
            options: *options,
            table_count: tables.len(),
            tables,
            with_schemas: schemas.is_some(),
        });
        self.status
    }
}
