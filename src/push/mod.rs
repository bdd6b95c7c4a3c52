// In: src/push/mod.rs

//! The capability boundary between batch assembly and the remote store.
//!
//! A `BatchPushEndpoint` is whatever exposes the remote batch-push entry point (a
//! connection handle in production, a recorder in tests). A `WriterPushStrategy`
//! decides how a prepared batch reaches that endpoint. Strategies are plain values
//! that can be composed: `MockFailurePushStrategy` decorates any other strategy.

use crate::types::TableSchema;

//==================================================================================
// 1. Module Declarations
//==================================================================================

mod batch;
mod default_strategy;
mod mock_failure;
mod status;

#[cfg(test)]
pub(crate) mod testing;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use self::batch::{
    BatchOptions, ColumnData, PushColumn, PushFlags, PushTable, TableCreation, TableData,
};
pub use self::default_strategy::DefaultPushStrategy;
pub use self::mock_failure::FailureSchedule;
#[cfg(any(test, feature = "mock-failure"))]
pub use self::mock_failure::MockFailurePushStrategy;
pub use self::status::Status;

//==================================================================================
// 3. Contracts
//==================================================================================

/// **CONTRACT:** The remote batch-push entry point of a connection handle.
pub trait BatchPushEndpoint {
    fn batch_push_with_options(
        &self,
        options: &BatchOptions,
        tables: &[PushTable<'_>],
        schemas: Option<&[TableSchema]>,
    ) -> Status;
}

/// **CONTRACT:** Submits a prepared batch through `handle`.
///
/// The number of tables is `tables.len()`. An implementation never panics on a
/// failed submission; every outcome is reported through the returned `Status`.
pub trait WriterPushStrategy {
    fn push(
        &self,
        handle: &dyn BatchPushEndpoint,
        options: &BatchOptions,
        tables: &[PushTable<'_>],
        schemas: Option<&[TableSchema]>,
    ) -> Status;
}

impl<F> WriterPushStrategy for F
where
    F: Fn(&dyn BatchPushEndpoint, &BatchOptions, &[PushTable<'_>], Option<&[TableSchema]>) -> Status,
{
    fn push(
        &self,
        handle: &dyn BatchPushEndpoint,
        options: &BatchOptions,
        tables: &[PushTable<'_>],
        schemas: Option<&[TableSchema]>,
    ) -> Status {
        self(handle, options, tables, schemas)
    }
}

/// Turns a closure into a push strategy.
///
/// Passing the closure through here pins down its signature, which inference
/// cannot do on its own for a closure bound to a local first.
pub fn push_fn<F>(f: F) -> F
where
    F: Fn(&dyn BatchPushEndpoint, &BatchOptions, &[PushTable<'_>], Option<&[TableSchema]>) -> Status,
{
    f
}
