// In: src/push/default_strategy.rs

use super::{BatchOptions, BatchPushEndpoint, PushTable, Status, WriterPushStrategy};
use crate::types::TableSchema;

/// Forwards every push to the remote batch-push entry point, unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultPushStrategy;

impl WriterPushStrategy for DefaultPushStrategy {
    fn push(
        &self,
        handle: &dyn BatchPushEndpoint,
        options: &BatchOptions,
        tables: &[PushTable<'_>],
        schemas: Option<&[TableSchema]>,
    ) -> Status {
        handle.batch_push_with_options(options, tables, schemas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::push::testing::RecordingEndpoint;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_default_strategy_forwards_once() {
        assert_send_sync::<DefaultPushStrategy>();

        let endpoint = RecordingEndpoint::returning(Status::OkCreated);
        let options = BatchOptions::default();

        let status = DefaultPushStrategy.push(&endpoint, &options, &[], None);

        assert_eq!(status, Status::OkCreated);
        let calls = endpoint.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].options, options);
        assert_eq!(calls[0].table_count, 0);
        assert!(!calls[0].with_schemas);
    }
}
