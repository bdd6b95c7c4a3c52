// In: src/config.rs

//! The single source of truth for batch writer configuration.
//!
//! `WriterConfig` is created once at the application boundary (from a JSON document,
//! Python keyword arguments or plain Rust) and shared read-only by the writer through
//! an `Arc<WriterConfig>`. Per-call overrides live in `PushOptions`.

use serde::{Deserialize, Serialize};

use crate::arena::DEFAULT_BLOCK_CAPACITY;
use crate::error::IngestError;
use crate::push::{FailureSchedule, PushFlags};
use crate::types::TimeRange;

//==================================================================================
// I. Core Configuration Enums
//==================================================================================

/// How the remote store applies a pushed batch.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PushMode {
    /// **Default:** the batch is applied atomically.
    #[default]
    Transactional,
    /// Non-transactional, faster ingestion.
    Fast,
    /// Buffered server-side and flushed asynchronously.
    Async,
    /// Replaces the data inside the truncate range(s) with the pushed rows.
    Truncate,
}

/// What the remote store does with rows that duplicate existing ones.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeduplicationMode {
    /// Duplicates are not detected.
    Disabled,
    /// **Default:** duplicate incoming rows are dropped.
    #[default]
    Drop,
    /// Duplicate existing rows are replaced.
    Upsert,
}

/// Which columns define a duplicate. Deserializes from a boolean or a list of names.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Deduplicate {
    /// `true` compares all columns; `false` disables deduplication.
    All(bool),
    /// Compare only the named columns.
    Columns(Vec<String>),
}

impl Default for Deduplicate {
    fn default() -> Self {
        Deduplicate::All(false)
    }
}

/// Deduplication settings, as sent along with each table of a batch.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct DeduplicateOptions {
    #[serde(default)]
    pub mode: DeduplicationMode,
    #[serde(default)]
    pub columns: Deduplicate,
}

impl DeduplicateOptions {
    pub fn new(mode: DeduplicationMode, columns: Deduplicate) -> Self {
        Self { mode, columns }
    }

    /// The mode actually sent: disabled only when `columns` is `false`.
    ///
    /// An explicit column list keeps the chosen mode even when it is empty.
    pub fn effective_mode(&self) -> DeduplicationMode {
        match &self.columns {
            Deduplicate::All(false) => DeduplicationMode::Disabled,
            Deduplicate::All(true) | Deduplicate::Columns(_) => self.mode,
        }
    }

    /// True unless `columns` is `false`.
    pub fn is_requested(&self) -> bool {
        self.columns != Deduplicate::All(false)
    }

    /// Column names restricting the comparison; empty means "all columns".
    pub fn where_duplicate(&self) -> &[String] {
        match &self.columns {
            Deduplicate::Columns(columns) => columns,
            Deduplicate::All(_) => &[],
        }
    }
}

//==================================================================================
// II. The Unified WriterConfig
//==================================================================================

/// Configuration of a batch writer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct WriterConfig {
    /// Capacity in bytes of the first blob arena block.
    #[serde(default = "default_blob_capacity")]
    pub initial_blob_capacity: usize,

    /// Push mode used when a call does not override it.
    #[serde(default)]
    pub push_mode: PushMode,

    /// If true, the server writes the batch through to persistent storage.
    #[serde(default = "default_true")]
    pub write_through: bool,

    /// If true, rows are reordered chronologically before submission.
    #[serde(default = "default_true")]
    pub sort_by_timestamp: bool,

    #[serde(default)]
    pub deduplication: DeduplicateOptions,

    /// Failures to inject before delegating; only read by the mock push strategy.
    #[serde(default)]
    pub mock_failure: Option<FailureSchedule>,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            initial_blob_capacity: default_blob_capacity(),
            push_mode: PushMode::default(),
            write_through: true,
            sort_by_timestamp: true,
            deduplication: DeduplicateOptions::default(),
            mock_failure: None,
        }
    }
}

impl WriterConfig {
    /// Parses a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, IngestError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Helper for `serde` to default a boolean field to true.
fn default_true() -> bool {
    true
}

fn default_blob_capacity() -> usize {
    DEFAULT_BLOCK_CAPACITY
}

//==================================================================================
// III. Per-Call Options
//==================================================================================

/// Options for a single push, seeded from a `WriterConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct PushOptions {
    pub mode: PushMode,
    pub write_through: bool,
    pub deduplicate: DeduplicateOptions,
    /// Explicit truncate range; only used with `PushMode::Truncate`.
    pub truncate_range: Option<TimeRange>,
}

impl PushOptions {
    pub fn from_config(config: &WriterConfig) -> Self {
        Self {
            mode: config.push_mode,
            write_through: config.write_through,
            deduplicate: config.deduplication.clone(),
            truncate_range: None,
        }
    }

    pub fn with_mode(mut self, mode: PushMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_write_through(mut self, write_through: bool) -> Self {
        self.write_through = write_through;
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: DeduplicateOptions) -> Self {
        self.deduplicate = deduplicate;
        self
    }

    pub fn with_truncate_range(mut self, range: TimeRange) -> Self {
        self.truncate_range = Some(range);
        self
    }

    pub fn push_flags(&self) -> PushFlags {
        if self.write_through {
            PushFlags::WRITE_THROUGH
        } else {
            PushFlags::NONE
        }
    }
}

impl Default for PushOptions {
    fn default() -> Self {
        Self::from_config(&WriterConfig::default())
    }
}
