// In: src/staging/column.rs

use crate::arena::{BlobArena, BlobRef};
use crate::error::IngestError;
use crate::kernels::apply_permutation_with_scratch;
use crate::push::ColumnData;
use crate::types::{ColumnType, Timespec, DOUBLE_NULL, INT64_NULL};

//==================================================================================
// 1. Caller-provided Column Values
//==================================================================================

/// The cells of one column as handed over by the caller. `None` marks a null cell.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    Int64(Vec<Option<i64>>),
    Double(Vec<Option<f64>>),
    Timestamp(Vec<Option<Timespec>>),
    Blob(Vec<Option<Vec<u8>>>),
    String(Vec<Option<String>>),
}

impl ColumnValues {
    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Int64(v) => v.len(),
            ColumnValues::Double(v) => v.len(),
            ColumnValues::Timestamp(v) => v.len(),
            ColumnValues::Blob(v) => v.len(),
            ColumnValues::String(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn kind(&self) -> &'static str {
        match self {
            ColumnValues::Int64(_) => "int64",
            ColumnValues::Double(_) => "double",
            ColumnValues::Timestamp(_) => "timestamp",
            ColumnValues::Blob(_) => "blob",
            ColumnValues::String(_) => "string",
        }
    }
}

//==================================================================================
// 2. Arena-backed Staged Column
//==================================================================================

/// A column in the representation pushed to the remote store.
///
/// Fixed-width nulls are stored as sentinels; blob-like cells are arena handles.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum StagedColumn {
    Int64(Vec<i64>),
    Double(Vec<f64>),
    Timestamp(Vec<Timespec>),
    Blob(Vec<Option<BlobRef>>),
    String(Vec<Option<BlobRef>>),
}

impl StagedColumn {
    pub(crate) fn empty(column_type: ColumnType) -> Self {
        match column_type {
            ColumnType::Int64 => StagedColumn::Int64(Vec::new()),
            ColumnType::Double => StagedColumn::Double(Vec::new()),
            ColumnType::Timestamp => StagedColumn::Timestamp(Vec::new()),
            ColumnType::Blob => StagedColumn::Blob(Vec::new()),
            ColumnType::String | ColumnType::Symbol => StagedColumn::String(Vec::new()),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            StagedColumn::Int64(v) => v.len(),
            StagedColumn::Double(v) => v.len(),
            StagedColumn::Timestamp(v) => v.len(),
            StagedColumn::Blob(v) | StagedColumn::String(v) => v.len(),
        }
    }

    /// Appends `rows` cells. `values == None` appends `rows` nulls.
    ///
    /// Blob and string cells are copied into `arena`.
    pub(crate) fn extend(
        &mut self,
        column_name: &str,
        values: Option<&ColumnValues>,
        rows: usize,
        arena: &mut BlobArena,
    ) -> Result<(), IngestError> {
        let Some(values) = values else {
            self.extend_nulls(rows);
            return Ok(());
        };

        match (self, values) {
            (StagedColumn::Int64(out), ColumnValues::Int64(cells)) => {
                out.extend(cells.iter().map(|c| c.unwrap_or(INT64_NULL)));
            }
            (StagedColumn::Double(out), ColumnValues::Double(cells)) => {
                out.extend(cells.iter().map(|c| c.unwrap_or(DOUBLE_NULL)));
            }
            (StagedColumn::Timestamp(out), ColumnValues::Timestamp(cells)) => {
                out.extend(cells.iter().map(|c| c.unwrap_or(Timespec::NULL)));
            }
            (StagedColumn::Blob(out), ColumnValues::Blob(cells)) => {
                out.reserve(cells.len());
                for cell in cells {
                    out.push(cell.as_deref().map(|b| arena.add(b)).transpose()?);
                }
            }
            (StagedColumn::String(out), ColumnValues::String(cells)) => {
                out.reserve(cells.len());
                for cell in cells {
                    out.push(cell.as_deref().map(|s| arena.add(s.as_bytes())).transpose()?);
                }
            }
            (staged, values) => {
                return Err(IngestError::IncompatibleType(format!(
                    "column '{}' expects {} data, got {}",
                    column_name,
                    staged.kind(),
                    values.kind()
                )));
            }
        }
        Ok(())
    }

    fn extend_nulls(&mut self, rows: usize) {
        match self {
            StagedColumn::Int64(out) => out.resize(out.len() + rows, INT64_NULL),
            StagedColumn::Double(out) => out.resize(out.len() + rows, DOUBLE_NULL),
            StagedColumn::Timestamp(out) => out.resize(out.len() + rows, Timespec::NULL),
            StagedColumn::Blob(out) | StagedColumn::String(out) => out.resize(out.len() + rows, None),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            StagedColumn::Int64(_) => "int64",
            StagedColumn::Double(_) => "double",
            StagedColumn::Timestamp(_) => "timestamp",
            StagedColumn::Blob(_) => "blob",
            StagedColumn::String(_) => "string",
        }
    }

    /// Reorders the cells by `perm`, leaving `perm` intact.
    pub(crate) fn permute(&mut self, perm: &[usize], scratch: &mut Vec<usize>) {
        match self {
            StagedColumn::Int64(v) => apply_permutation_with_scratch(v, perm, scratch),
            StagedColumn::Double(v) => apply_permutation_with_scratch(v, perm, scratch),
            StagedColumn::Timestamp(v) => apply_permutation_with_scratch(v, perm, scratch),
            StagedColumn::Blob(v) | StagedColumn::String(v) => {
                apply_permutation_with_scratch(v, perm, scratch)
            }
        }
    }

    /// Borrows the column as a push descriptor, resolving blob handles in `arena`.
    pub(crate) fn as_column_data<'a>(
        &'a self,
        arena: &'a BlobArena,
    ) -> Result<ColumnData<'a>, IngestError> {
        let resolve = |cells: &'a [Option<BlobRef>]| -> Result<Vec<Option<&'a [u8]>>, IngestError> {
            cells
                .iter()
                .map(|cell| cell.map(|blob| arena.resolve(blob)).transpose())
                .collect()
        };
        Ok(match self {
            StagedColumn::Int64(v) => ColumnData::Int64(v),
            StagedColumn::Double(v) => ColumnData::Double(v),
            StagedColumn::Timestamp(v) => ColumnData::Timestamp(v),
            StagedColumn::Blob(v) => ColumnData::Blob(resolve(v)?),
            StagedColumn::String(v) => ColumnData::String(resolve(v)?),
        })
    }
}
