// In: src/writer.rs

//! The batch writer: stages caller data, assembles a batch and pushes it once.
//!
//! A `Writer` owns the blob arena that backs every batch it builds, so blob and
//! string cells are copied exactly once between the caller and the push call. The
//! arena is cleared at the start of each push and its blocks are reused.
//!
//! Retrying is the caller's business. A failed push surfaces as
//! `IngestError::PushFailed` carrying the status the strategy returned.

use std::sync::Arc;

use crate::arena::BlobArena;
use crate::config::{PushMode, PushOptions, WriterConfig};
use crate::error::IngestError;
use crate::push::{
    BatchOptions, BatchPushEndpoint, DefaultPushStrategy, PushTable, Status, WriterPushStrategy,
};
use crate::staging::{StagedTables, WriterData};
use crate::types::TimeRange;

pub struct Writer<S = DefaultPushStrategy> {
    handle: Arc<dyn BatchPushEndpoint>,
    strategy: S,
    config: Arc<WriterConfig>,
    arena: BlobArena,
}

impl Writer<DefaultPushStrategy> {
    /// A writer that forwards every push straight to `handle`.
    pub fn from_config(
        handle: Arc<dyn BatchPushEndpoint>,
        config: Arc<WriterConfig>,
    ) -> Result<Self, IngestError> {
        Self::new(handle, DefaultPushStrategy, config)
    }
}

impl<S: WriterPushStrategy> Writer<S> {
    pub fn new(
        handle: Arc<dyn BatchPushEndpoint>,
        strategy: S,
        config: Arc<WriterConfig>,
    ) -> Result<Self, IngestError> {
        let arena = BlobArena::with_capacity(config.initial_blob_capacity)?;
        Ok(Self {
            handle,
            strategy,
            config,
            arena,
        })
    }

    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn arena(&self) -> &BlobArena {
        &self.arena
    }

    /// Pushes `data` with the options of the writer's configuration.
    pub fn push(&mut self, data: &WriterData) -> Result<(), IngestError> {
        let options = PushOptions::from_config(&self.config);
        self.push_with(data, &options)
    }

    /// Pushes `data` as a single batch.
    pub fn push_with(&mut self, data: &WriterData, options: &PushOptions) -> Result<(), IngestError> {
        if options.mode == PushMode::Truncate {
            if options.deduplicate.is_requested() {
                return Err(IngestError::InvalidArgument(
                    "Cannot set `deduplicate` for push_truncate.".to_string(),
                ));
            }
            if data.is_empty() {
                return Err(IngestError::InvalidArgument(
                    "Writer is empty: you did not provide any rows to push.".to_string(),
                ));
            }
        }

        self.arena.clear();
        let mut staged = StagedTables::index(data, &mut self.arena)?;
        if staged.is_empty() {
            return Err(IngestError::InvalidArgument(
                "No data written to batch writer.".to_string(),
            ));
        }
        if self.config.sort_by_timestamp {
            staged.sort_by_index();
        }

        let truncate_range = match options.mode {
            PushMode::Truncate => Some(Self::truncate_range(&staged, options)?),
            _ => None,
        };

        let mut batch: Vec<PushTable<'_>> = Vec::with_capacity(staged.len());
        for table in staged.iter() {
            let push_table = table.prepare_batch(&self.arena, options, truncate_range)?;
            if push_table.column_count() == 0 {
                return Err(IngestError::InvalidArgument(
                    "Writer is empty: you did not provide any columns to push.".to_string(),
                ));
            }
            log::debug!(
                "Pushing {} rows with {} columns in {}",
                push_table.row_count(),
                push_table.column_count(),
                push_table.name
            );
            batch.push(push_table);
        }

        let batch_options = BatchOptions::new(options.mode, options.push_flags());
        let status = self
            .strategy
            .push(self.handle.as_ref(), &batch_options, &batch, None);

        log_metric!(
            "event" = "batch_push",
            "mode" = &format!("{:?}", options.mode),
            "tables" = &batch.len(),
            "rows" = &batch.iter().map(PushTable::row_count).sum::<usize>(),
            "blob_bytes" = &self.arena.bytes_count(),
            "status" = &status
        );

        Self::check_status(status)
    }

    /// The explicit range, or the time range of the only table.
    fn truncate_range(
        staged: &StagedTables,
        options: &PushOptions,
    ) -> Result<TimeRange, IngestError> {
        if let Some(range) = options.truncate_range {
            return Ok(range);
        }
        let mut tables = staged.iter();
        match (tables.next(), tables.next()) {
            (Some(table), None) => table.time_range().ok_or_else(|| {
                IngestError::InvalidArgument(
                    "Writer is empty: you did not provide any rows to push.".to_string(),
                )
            }),
            _ => Err(IngestError::InvalidArgument(
                "Writer push truncate only supports a single table unless an explicit range \
                 is provided: you provided more than one table without an explicit range."
                    .to_string(),
            )),
        }
    }

    fn check_status(status: Status) -> Result<(), IngestError> {
        if status.is_ok() {
            log::debug!("batch push succeeded: {}", status);
            Ok(())
        } else {
            log::warn!("batch push failed: {}", status);
            Err(IngestError::PushFailed { status })
        }
    }
}

impl<S> std::fmt::Debug for Writer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Writer")
            .field("config", &self.config)
            .field("arena", &self.arena)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "writer_tests.rs"]
mod tests;
