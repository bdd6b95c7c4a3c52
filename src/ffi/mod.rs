//! Foreign-function bindings, compiled with the `python` feature.

pub mod python;

pub use python::{
    apply_permutation_py, enable_verbose_logging_py, sort_permutation_py, PyBlobArena, PyBlobRef,
};
#[cfg(feature = "mock-failure")]
pub use python::PyMockFailureOptions;
