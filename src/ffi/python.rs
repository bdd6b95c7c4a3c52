// In: src/ffi/python.rs

use log::LevelFilter;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyList};

use crate::arena::{BlobArena, BlobRef, DEFAULT_BLOCK_CAPACITY};
use crate::kernels::{self, is_permutation};
use crate::observability;

//==================================================================================
// I. Blob Arena
//==================================================================================

/// A handle to bytes stored in a `BlobArena`.
#[pyclass(name = "BlobRef", module = "qdb_ingest", frozen)]
#[derive(Clone, Copy)]
pub struct PyBlobRef {
    inner: BlobRef,
}

#[pymethods]
impl PyBlobRef {
    #[getter]
    fn generation(&self) -> u64 {
        self.inner.generation()
    }

    #[getter]
    fn block(&self) -> usize {
        self.inner.block()
    }

    #[getter]
    fn offset(&self) -> usize {
        self.inner.offset()
    }

    fn __len__(&self) -> usize {
        self.inner.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "BlobRef(generation={}, block={}, offset={}, len={})",
            self.inner.generation(),
            self.inner.block(),
            self.inner.offset(),
            self.inner.len()
        )
    }
}

#[pyclass(name = "BlobArena", module = "qdb_ingest")]
pub struct PyBlobArena {
    inner: BlobArena,
}

#[pymethods]
impl PyBlobArena {
    #[new]
    #[pyo3(signature = (initial_capacity = DEFAULT_BLOCK_CAPACITY))]
    fn new(initial_capacity: usize) -> PyResult<Self> {
        Ok(Self {
            inner: BlobArena::with_capacity(initial_capacity)?,
        })
    }

    /// Copies `data` into the arena and returns a handle to the copy.
    fn add(&mut self, data: &[u8]) -> PyResult<PyBlobRef> {
        Ok(PyBlobRef {
            inner: self.inner.add(data)?,
        })
    }

    /// Returns the stored bytes, or `None` if the handle predates the last `clear()`.
    fn get(&self, py: Python, blob: PyBlobRef) -> Option<PyObject> {
        self.inner
            .get(blob.inner)
            .map(|bytes| PyBytes::new(py, bytes).into_py(py))
    }

    fn clear(&mut self) {
        self.inner.clear();
    }

    fn bytes_count(&self) -> usize {
        self.inner.bytes_count()
    }

    fn block_count(&self) -> usize {
        self.inner.block_count()
    }

    fn allocated_bytes(&self) -> usize {
        self.inner.allocated_bytes()
    }

    fn __len__(&self) -> usize {
        self.inner.bytes_count()
    }

    fn __repr__(&self) -> String {
        format!("{:?}", self.inner)
    }
}

//==================================================================================
// II. Sorting & Permutations
//==================================================================================

/// Returns the indices that stably sort `values` in ascending order.
///
/// `values` may hold any mutually comparable Python objects; the first failing
/// comparison is raised.
#[pyfunction]
#[pyo3(name = "sort_permutation")]
pub fn sort_permutation_py(values: Vec<&PyAny>) -> PyResult<Vec<usize>> {
    let mut first_error: Option<PyErr> = None;
    let perm = kernels::sort_permutation(&values, |a, b| match a.lt(*b) {
        Ok(less) => less,
        Err(err) => {
            first_error.get_or_insert(err);
            false
        }
    });
    match first_error {
        Some(err) => Err(err),
        None => Ok(perm),
    }
}

/// Reorders `items` in place so that `items[k]` becomes the old `items[permutation[k]]`.
#[pyfunction]
#[pyo3(name = "apply_permutation")]
pub fn apply_permutation_py(items: &PyList, permutation: Vec<usize>) -> PyResult<()> {
    if items.len() != permutation.len() {
        return Err(PyValueError::new_err(format!(
            "permutation has {} entries but the list has {} items",
            permutation.len(),
            items.len()
        )));
    }
    if !is_permutation(&permutation) {
        return Err(PyValueError::new_err(
            "not a permutation: every index in 0..n must appear exactly once",
        ));
    }

    let py = items.py();
    let mut values: Vec<PyObject> = items.iter().map(|item| item.to_object(py)).collect();
    let mut permutation = permutation;
    kernels::apply_permutation(&mut values, &mut permutation);
    for (i, value) in values.into_iter().enumerate() {
        items.set_item(i, value)?;
    }
    Ok(())
}

//==================================================================================
// III. Failure Injection
//==================================================================================

#[cfg(feature = "mock-failure")]
pub use self::mock::PyMockFailureOptions;

#[cfg(feature = "mock-failure")]
mod mock {
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::push::{FailureSchedule, Status};

    /// Number of pushes to fail, and the status to fail them with.
    #[pyclass(name = "MockFailureOptions", module = "qdb_ingest", frozen)]
    #[derive(Clone, Copy)]
    pub struct PyMockFailureOptions {
        pub(crate) inner: FailureSchedule,
    }

    fn parse_status(name: &str) -> PyResult<Status> {
        serde_json::from_value(serde_json::Value::String(name.to_string()))
            .map_err(|_| PyValueError::new_err(format!("unknown status '{}'", name)))
    }

    #[pymethods]
    impl PyMockFailureOptions {
        #[new]
        #[pyo3(signature = (failures = 0, error = "async_pipe_full"))]
        fn new(failures: u64, error: &str) -> PyResult<Self> {
            Ok(Self {
                inner: FailureSchedule::new(failures, parse_status(error)?),
            })
        }

        #[getter]
        fn failures_left(&self) -> u64 {
            self.inner.failures_left
        }

        #[getter]
        fn error(&self) -> String {
            self.inner.error.to_string()
        }

        fn has_next(&self) -> bool {
            self.inner.has_next()
        }

        fn next(&self) -> PyResult<Self> {
            if !self.inner.has_next() {
                return Err(PyValueError::new_err("no mocked failures left"));
            }
            Ok(Self {
                inner: self.inner.next(),
            })
        }

        fn __repr__(&self) -> String {
            format!(
                "MockFailureOptions(failures_left={}, error='{}')",
                self.inner.failures_left, self.inner.error
            )
        }
    }
}

//==================================================================================
// IV. Logging
//==================================================================================

/// Routes the crate's log records to stderr, or appended to `log_file`.
#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) -> PyResult<()> {
    observability::init_logging(LevelFilter::Info, log_file.as_deref())?;
    Ok(())
}
