//! Errors raised to Python.
//!
//! Native failures keep their kind when they become Python exceptions;
//! failures raised by Python itself pass through untouched.

use orabridge_native::NativeError;
use pyo3::create_exception;
use pyo3::exceptions::{PyException, PyLookupError, PyTypeError};
use pyo3::PyErr;

create_exception!(orabridge, Error, PyException, "Base class of all orabridge errors.");
create_exception!(
    orabridge,
    DatabaseError,
    Error,
    "Raised when the native client library reports a failure."
);
create_exception!(
    orabridge,
    ProgrammingError,
    DatabaseError,
    "Raised when the library is used incorrectly."
);

/// Result type for boundary operations called from Python
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Error from either side of the boundary
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    /// Raised by the native side
    #[error(transparent)]
    Native(#[from] NativeError),

    /// Raised by a Python operation; re-raised unchanged
    #[error(transparent)]
    Host(#[from] PyErr),
}

impl From<BridgeError> for PyErr {
    fn from(err: BridgeError) -> PyErr {
        match err {
            BridgeError::Host(err) => err,
            BridgeError::Native(err) => match err {
                NativeError::Configuration { message } => ProgrammingError::new_err(message),
                NativeError::TypeMismatch { message } => PyTypeError::new_err(message),
                NativeError::UnsupportedEncoding { .. } => PyLookupError::new_err(err.to_string()),
                NativeError::Native(_) => DatabaseError::new_err(err.to_string()),
            },
        }
    }
}
