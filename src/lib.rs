//! The Rust core of the quasardb bulk-ingestion path.
//!
//! This file serves as the root of the crate. It has two main responsibilities:
//! 1.  Declaring the crate's modules: the blob arena, the sorting and permutation
//!     kernels, staging, the push strategies and the writer that ties them together.
//! 2.  Defining the `#[pymodule]` (feature `python`) which acts as the main entry
//!     point when the compiled library is imported into Python.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
pub mod observability; // Make macros available throughout the crate

pub mod arena;
pub mod bridge;
pub mod config;
pub mod error;
pub mod kernels;
pub mod push;
pub mod staging;
pub mod types;
pub mod writer;

#[cfg(feature = "python")]
mod ffi;

pub use arena::{BlobArena, BlobRef};
pub use config::{PushMode, PushOptions, WriterConfig};
pub use error::IngestError;
pub use push::{
    BatchOptions, BatchPushEndpoint, DefaultPushStrategy, FailureSchedule, Status,
    WriterPushStrategy,
};
pub use staging::{ColumnValues, WriterData};
pub use writer::Writer;

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `qdb_ingest` Python module, containing all exposed Rust functions.
#[cfg(feature = "python")]
#[pymodule]
fn qdb_ingest(py: Python, m: &PyModule) -> PyResult<()> {
    // --- Sorting & permutations ---
    m.add_function(wrap_pyfunction!(ffi::sort_permutation_py, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::apply_permutation_py, m)?)?;

    // --- Classes ---
    m.add_class::<ffi::PyBlobArena>()?;
    m.add_class::<ffi::PyBlobRef>()?;
    #[cfg(feature = "mock-failure")]
    m.add_class::<ffi::PyMockFailureOptions>()?;

    // --- Expose the custom error type ---
    m.add("IngestError", py.get_type::<pyo3::exceptions::PyValueError>())?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    m.add_function(wrap_pyfunction!(ffi::enable_verbose_logging_py, m)?)?;

    Ok(())
}
