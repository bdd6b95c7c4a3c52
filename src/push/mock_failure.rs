// In: src/push/mock_failure.rs

//! Deterministic failure injection for exercising retry logic.
//!
//! `MockFailurePushStrategy` wraps another strategy. While its `FailureSchedule` has
//! failures left it answers every push with the scheduled error and never reaches the
//! delegate; once the schedule is exhausted every call is delegated.

use serde::{Deserialize, Serialize};

use super::Status;

/// How many pushes to fail, and with which status.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureSchedule {
    #[serde(default)]
    pub failures_left: u64,
    #[serde(default = "default_error")]
    pub error: Status,
}

fn default_error() -> Status {
    Status::AsyncPipeFull
}

impl Default for FailureSchedule {
    fn default() -> Self {
        Self {
            failures_left: 0,
            error: default_error(),
        }
    }
}

impl FailureSchedule {
    pub fn new(failures_left: u64, error: Status) -> Self {
        Self {
            failures_left,
            error,
        }
    }

    pub fn has_next(&self) -> bool {
        self.failures_left > 0
    }

    /// The schedule after one more failure has been emitted.
    ///
    /// # Panics
    /// Panics if no failure is left.
    pub fn next(&self) -> FailureSchedule {
        assert!(self.has_next(), "failure schedule is exhausted");
        Self {
            failures_left: self.failures_left - 1,
            error: self.error,
        }
    }
}

#[cfg(any(test, feature = "mock-failure"))]
pub use self::strategy::MockFailurePushStrategy;

#[cfg(any(test, feature = "mock-failure"))]
mod strategy {
    use std::cell::Cell;

    use super::FailureSchedule;
    use crate::config::WriterConfig;
    use crate::push::{
        BatchOptions, BatchPushEndpoint, DefaultPushStrategy, PushTable, Status,
        WriterPushStrategy,
    };
    use crate::types::TableSchema;

    /// A push strategy that fails a fixed number of times before delegating.
    ///
    /// The schedule lives in a `Cell`, so the strategy is `Send` but not `Sync`.
    #[derive(Debug)]
    pub struct MockFailurePushStrategy<D = DefaultPushStrategy> {
        schedule: Cell<FailureSchedule>,
        delegate: D,
    }

    impl MockFailurePushStrategy<DefaultPushStrategy> {
        pub fn new(schedule: FailureSchedule) -> Self {
            Self::with_delegate(schedule, DefaultPushStrategy)
        }

        /// Builds the strategy from `config.mock_failure`; no schedule means no failures.
        pub fn from_config(config: &WriterConfig) -> Self {
            Self::new(config.mock_failure.unwrap_or_default())
        }
    }

    impl<D: WriterPushStrategy> MockFailurePushStrategy<D> {
        pub fn with_delegate(schedule: FailureSchedule, delegate: D) -> Self {
            Self {
                schedule: Cell::new(schedule),
                delegate,
            }
        }

        /// The schedule that the next push will consult.
        pub fn schedule(&self) -> FailureSchedule {
            self.schedule.get()
        }

        pub fn delegate(&self) -> &D {
            &self.delegate
        }
    }

    impl<D: WriterPushStrategy> WriterPushStrategy for MockFailurePushStrategy<D> {
        fn push(
            &self,
            handle: &dyn BatchPushEndpoint,
            options: &BatchOptions,
            tables: &[PushTable<'_>],
            schemas: Option<&[TableSchema]>,
        ) -> Status {
            let schedule = self.schedule.get();
            if schedule.has_next() {
                let next = schedule.next();
                self.schedule.set(next);
                log::info!(
                    "mocked failure: returning '{}', {} failure(s) left",
                    next.error,
                    next.failures_left
                );
                return next.error;
            }
            self.delegate.push(handle, options, tables, schemas)
        }
    }
}
