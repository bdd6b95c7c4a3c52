//! This module defines the core, strongly-typed data representations used
//! throughout the batch assembly path.
//!
//! It includes the canonical `ColumnType` enum, the `Timespec` timestamp used for
//! table indexes and the null sentinels the remote store understands.

pub mod column_type;
pub mod timespec;

// Re-export the main type(s) for easier access.
pub use column_type::{ColumnInfo, ColumnType, TableSchema};
pub use timespec::{TimeRange, Timespec};

/// Null sentinel for int64 cells.
pub const INT64_NULL: i64 = i64::MIN;

/// Null sentinel for double cells.
pub const DOUBLE_NULL: f64 = f64::NAN;
