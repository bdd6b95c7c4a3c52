// In: src/staging/staged_table.rs

use crate::arena::BlobArena;
use crate::config::{PushMode, PushOptions};
use crate::error::IngestError;
use crate::kernels::{apply_permutation, sort_permutation};
use crate::push::{PushColumn, PushTable, TableCreation, TableData};
use crate::types::{TableSchema, TimeRange, Timespec};

use super::column::{ColumnValues, StagedColumn};

/// The rows of one table, accumulated from every append that targeted it.
#[derive(Debug, Clone)]
pub struct StagedTable {
    schema: TableSchema,
    index: Vec<Timespec>,
    columns: Vec<StagedColumn>,
}

impl StagedTable {
    pub fn new(schema: TableSchema) -> Self {
        let columns = schema
            .columns
            .iter()
            .map(|c| StagedColumn::empty(c.column_type))
            .collect();
        Self {
            schema,
            index: Vec::new(),
            columns,
        }
    }

    /// Appends rows, copying blob and string cells into `arena`.
    ///
    /// On error the table may hold a partial append and should be discarded.
    pub fn append(
        &mut self,
        index: &[Timespec],
        columns: &[Option<ColumnValues>],
        arena: &mut BlobArena,
    ) -> Result<(), IngestError> {
        if columns.len() != self.columns.len() {
            return Err(IngestError::InvalidArgument(format!(
                "table '{}' has {} columns, got data for {}",
                self.schema.name,
                self.columns.len(),
                columns.len()
            )));
        }

        for ((staged, info), values) in self
            .columns
            .iter_mut()
            .zip(&self.schema.columns)
            .zip(columns)
        {
            staged.extend(&info.name, values.as_ref(), index.len(), arena)?;
        }
        self.index.extend_from_slice(index);
        Ok(())
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn name(&self) -> &str {
        &self.schema.name
    }

    pub fn index(&self) -> &[Timespec] {
        &self.index
    }

    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_sorted(&self) -> bool {
        self.index.windows(2).all(|w| w[0] <= w[1])
    }

    /// Orders all rows chronologically. Rows with equal timestamps keep their order.
    pub fn sort_by_index(&mut self) {
        if self.is_sorted() {
            return;
        }

        let mut perm = sort_permutation(&self.index, |a, b| a < b);
        let mut scratch = Vec::with_capacity(perm.len());
        for column in &mut self.columns {
            column.permute(&perm, &mut scratch);
        }
        // The index goes last: this consumes the permutation.
        apply_permutation(&mut self.index, &mut perm);
    }

    /// `[first, last + 1ns)` of the index, assuming it is sorted.
    pub fn time_range(&self) -> Option<TimeRange> {
        let first = self.index.first()?;
        let last = self.index.last()?;
        Some(TimeRange::new(*first, last.next_nanosecond()))
    }

    /// Borrows the table as a push descriptor.
    ///
    /// `truncate_range` is only attached in `PushMode::Truncate`.
    pub fn prepare_batch<'a>(
        &'a self,
        arena: &'a BlobArena,
        options: &'a PushOptions,
        truncate_range: Option<TimeRange>,
    ) -> Result<PushTable<'a>, IngestError> {
        debug_assert!(self.columns.iter().all(|c| c.len() == self.index.len()));

        let columns = self
            .columns
            .iter()
            .zip(&self.schema.columns)
            .map(|(staged, info)| {
                Ok(PushColumn {
                    name: &info.name,
                    data: staged.as_column_data(arena)?,
                })
            })
            .collect::<Result<Vec<_>, IngestError>>()?;

        let truncate_ranges = match options.mode {
            PushMode::Truncate => truncate_range.into_iter().collect(),
            _ => Vec::new(),
        };

        Ok(PushTable {
            name: &self.schema.name,
            data: TableData {
                row_count: self.index.len(),
                timestamps: &self.index,
                columns,
            },
            truncate_ranges,
            deduplication_mode: options.deduplicate.effective_mode(),
            where_duplicate: options.deduplicate.where_duplicate(),
            creation: TableCreation::DontCreate,
        })
    }
}

#[cfg(test)]
#[path = "staged_table_tests.rs"]
mod tests;
