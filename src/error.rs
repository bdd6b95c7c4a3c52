// In: src/error.rs

//! This module defines the single, unified error type for the entire ingestion core.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

use crate::push::Status;

#[derive(Error, Debug)]
pub enum IngestError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to batch assembly)
    // =========================================================================
    #[error("Failed to allocate a blob block of {requested} bytes")]
    AllocationFailed { requested: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Incompatible column type: {0}")]
    IncompatibleType(String),

    #[error("Batch push failed with status {status}")]
    PushFailed { status: Status },

    #[error("Blob reference belongs to a cleared arena generation")]
    StaleBlob,

    #[error("Logger initialisation failed: {0}")]
    Logging(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error from the underlying I/O subsystem, e.g. opening a log file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a config.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error for Python FFI (Foreign Function Interface) operations.
    #[cfg(feature = "python")]
    #[error("FFI operation failed: {0}")]
    FfiError(String), // PyErr doesn't impl Error, so we can't use #[from] here.
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for IngestError {
    fn from(err: pyo3::PyErr) -> Self {
        IngestError::FfiError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<IngestError> for pyo3::PyErr {
    fn from(err: IngestError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
