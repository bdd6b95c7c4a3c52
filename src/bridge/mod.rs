// In: src/bridge/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Bridge Layer
// ====================================================================================
//
// The `bridge` converts columnar data from the outside world (Arrow record batches)
// into the caller-side `WriterData` the writer stages. It never touches the arena or
// the push path itself.
//
// Data Flow:
//
//   1. [RecordBatch]                       -> index column + one array per table column
//         |
//         `-> arrow_impl::append_record_batch
//                a. index array  -> Vec<Timespec>
//                b. each column  -> ColumnValues (nulls preserved)
//         |
//   2. [WriterData::append]                -> shape validation
//         |
//   3. [Writer::push]                      -> staging, sorting, push strategy
//
// ====================================================================================
pub mod arrow_impl;

pub use arrow_impl::{append_record_batch, arrow_to_column_values, schema_from_arrow};
