// In: src/push/batch.rs

//! Borrowed descriptors of an assembled batch.
//!
//! Every descriptor borrows from the staged tables and the blob arena that produced
//! it. Nothing here owns row data, so building a batch costs one `Vec` of slices per
//! blob-like column and no copies of the cells themselves.

use std::ops::BitOr;

use crate::config::{DeduplicationMode, PushMode};
use crate::types::{TimeRange, Timespec};

//==================================================================================
// 1. Batch-wide Options
//==================================================================================

/// Bit set of flags sent along with a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PushFlags(u32);

impl PushFlags {
    pub const NONE: PushFlags = PushFlags(0);
    pub const WRITE_THROUGH: PushFlags = PushFlags(1);

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn contains(&self, other: PushFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for PushFlags {
    type Output = PushFlags;

    fn bitor(self, rhs: PushFlags) -> PushFlags {
        PushFlags(self.0 | rhs.0)
    }
}

/// Options that apply to the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchOptions {
    pub mode: PushMode,
    pub push_flags: PushFlags,
}

impl BatchOptions {
    pub fn new(mode: PushMode, push_flags: PushFlags) -> Self {
        Self { mode, push_flags }
    }
}

//==================================================================================
// 2. Per-table Descriptors
//==================================================================================

/// Whether the remote store may create a table that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableCreation {
    #[default]
    DontCreate,
    Create,
}

/// The cells of one column, in index order.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData<'a> {
    Int64(&'a [i64]),
    Double(&'a [f64]),
    Timestamp(&'a [Timespec]),
    /// `None` marks a null cell.
    Blob(Vec<Option<&'a [u8]>>),
    /// UTF-8 bytes; symbol columns are pushed as strings too.
    String(Vec<Option<&'a [u8]>>),
}

impl ColumnData<'_> {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int64(values) => values.len(),
            ColumnData::Double(values) => values.len(),
            ColumnData::Timestamp(values) => values.len(),
            ColumnData::Blob(values) | ColumnData::String(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PushColumn<'a> {
    pub name: &'a str,
    pub data: ColumnData<'a>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableData<'a> {
    pub row_count: usize,
    pub timestamps: &'a [Timespec],
    pub columns: Vec<PushColumn<'a>>,
}

/// One table of a batch, ready for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct PushTable<'a> {
    pub name: &'a str,
    pub data: TableData<'a>,
    /// Only populated for `PushMode::Truncate`.
    pub truncate_ranges: Vec<TimeRange>,
    pub deduplication_mode: DeduplicationMode,
    /// Columns defining a duplicate; empty compares all columns.
    pub where_duplicate: &'a [String],
    pub creation: TableCreation,
}

impl PushTable<'_> {
    pub fn row_count(&self) -> usize {
        self.data.row_count
    }

    pub fn column_count(&self) -> usize {
        self.data.columns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_flags() {
        let flags = PushFlags::NONE | PushFlags::WRITE_THROUGH;
        assert!(flags.contains(PushFlags::WRITE_THROUGH));
        assert!(!PushFlags::NONE.contains(PushFlags::WRITE_THROUGH));
        assert_eq!(flags.bits(), 1);
    }

    #[test]
    fn test_column_data_len() {
        let ints = [1i64, 2, 3];
        assert_eq!(ColumnData::Int64(&ints).len(), 3);
        let blobs = ColumnData::Blob(vec![Some(&b"a"[..]), None]);
        assert_eq!(blobs.len(), 2);
        assert!(ColumnData::Double(&[]).is_empty());
    }
}
