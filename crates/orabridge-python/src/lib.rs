//! Python bindings for the orabridge database boundary.
//!
//! This crate adapts Python values to the native client library:
//! - Initialize the native client context once per process
//! - Normalize dict/list/str/bytes arguments into UTF-8 buffers
//! - Turn documents, dicts and lists into owned native document handles
//! - Raise native failures as typed Python exceptions

pub mod client;
pub mod error;
pub mod normalize;
pub mod soda;
pub mod values;

use pyo3::prelude::*;

pub use client::{lifecycle, register_native_client};
pub use error::{BridgeError, BridgeResult, DatabaseError, Error, ProgrammingError};
pub use normalize::{normalize_document_argument, normalize_json_argument, DocumentArg};
pub use soda::{PySodaDatabase, PySodaDoc};
pub use values::{coerce_boolean, format_string, type_identity};

/// Add the module's classes, functions and exceptions to `m`.
pub fn register_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    let py = m.py();
    m.add_class::<PySodaDoc>()?;
    m.add_class::<PySodaDatabase>()?;
    m.add_function(wrap_pyfunction!(client::init_client, m)?)?;
    m.add_function(wrap_pyfunction!(client::client_version, m)?)?;
    m.add_function(wrap_pyfunction!(soda::open_soda_database, m)?)?;

    m.add("Error", py.get_type::<Error>())?;
    m.add("DatabaseError", py.get_type::<DatabaseError>())?;
    m.add("ProgrammingError", py.get_type::<ProgrammingError>())?;

    // Module metadata
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}

/// Python module definition.
#[pymodule]
fn orabridge(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_module(m)
}
