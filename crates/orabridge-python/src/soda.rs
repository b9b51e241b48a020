//! Document-store classes exposed to Python.

use orabridge_native::{SodaDatabase, SodaDocument};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyString};

use crate::client::context;
use crate::error::BridgeError;
use crate::normalize::{normalize_document_argument, normalize_json_argument};
use crate::values::coerce_boolean;

fn decode(bytes: Option<Vec<u8>>) -> PyResult<Option<String>> {
    bytes
        .map(|bytes| String::from_utf8(bytes).map_err(|e| PyValueError::new_err(e.to_string())))
        .transpose()
}

/// A document owned by the document store
#[pyclass(name = "SodaDoc", module = "orabridge", frozen)]
pub struct PySodaDoc {
    document: SodaDocument,
}

impl PySodaDoc {
    pub fn new(document: SodaDocument) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &SodaDocument {
        &self.document
    }
}

#[pymethods]
impl PySodaDoc {
    /// Document key, if one was assigned
    #[getter]
    fn key(&self) -> PyResult<Option<String>> {
        let content = self.document.content().map_err(BridgeError::from)?;
        decode(content.key)
    }

    /// Media type, if one was given at creation
    #[getter]
    fn media_type(&self) -> PyResult<Option<String>> {
        let content = self.document.content().map_err(BridgeError::from)?;
        decode(content.media_type)
    }

    /// Document content as text, or as bytes when `as_bytes` is true
    #[pyo3(signature = (as_bytes=None))]
    fn content<'py>(
        &self,
        py: Python<'py>,
        as_bytes: Option<Bound<'py, PyAny>>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let as_bytes = coerce_boolean(as_bytes.as_ref(), false)?;
        let content = self.document.content().map_err(BridgeError::from)?;
        if as_bytes {
            return Ok(PyBytes::new(py, &content.content).into_any());
        }
        let text = std::str::from_utf8(&content.content)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyString::new(py, text).into_any())
    }

    fn __repr__(&self) -> String {
        format!("<orabridge.SodaDoc {:p}>", self.document.raw().as_ptr())
    }
}

/// Document-store database of the native client context
#[pyclass(name = "SodaDatabase", module = "orabridge", frozen)]
pub struct PySodaDatabase {
    database: SodaDatabase,
}

#[pymethods]
impl PySodaDatabase {
    /// Create a document from a dict, list, str or bytes
    #[pyo3(signature = (content, key=None, media_type=None))]
    fn create_document(
        &self,
        content: &Bound<'_, PyAny>,
        key: Option<&str>,
        media_type: Option<&str>,
    ) -> PyResult<PySodaDoc> {
        let buffer = normalize_json_argument(content)?;
        let document = self
            .database
            .create_document(
                buffer.as_bytes(),
                key.map(str::as_bytes),
                media_type.map(str::as_bytes),
            )
            .map_err(BridgeError::from)?;
        Ok(PySodaDoc::new(document))
    }

    /// Return `arg` as a document, creating one from a dict or list
    fn coerce_document(&self, arg: &Bound<'_, PyAny>) -> PyResult<PySodaDoc> {
        let document = normalize_document_argument(&self.database, arg)?;
        Ok(PySodaDoc::new(document))
    }

    fn __repr__(&self) -> String {
        format!("<orabridge.SodaDatabase {:p}>", self.database.raw().as_ptr())
    }
}

/// Open the document-store database, initializing the client if needed
#[pyfunction]
pub fn open_soda_database() -> PyResult<PySodaDatabase> {
    let database = context()
        .and_then(|context| context.open_database())
        .map_err(BridgeError::from)?;
    Ok(PySodaDatabase { database })
}
