//! Normalization of JSON and document arguments.
//!
//! Dictionaries and lists are serialized with `json.dumps` and encoded as
//! UTF-8, which is what the document store expects. Strings and bytes are
//! taken as already serialized.

use orabridge_native::config::DEFAULT_ENCODING;
use orabridge_native::{Buffer, NativeError, SodaDatabase, SodaDocument};
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict, PyList, PyString};
use tracing::debug;

use crate::error::BridgeResult;
use crate::soda::PySodaDoc;
use crate::values::qualified_type_name;

/// Shape of an argument that should become a document
pub enum DocumentArg<'a, 'py> {
    /// An existing document object
    Document(&'a Bound<'py, PySodaDoc>),
    /// A dictionary or list to serialize
    Literal(&'a Bound<'py, PyAny>),
    /// Anything else
    Invalid(&'a Bound<'py, PyAny>),
}

impl<'a, 'py> DocumentArg<'a, 'py> {
    pub fn classify(arg: &'a Bound<'py, PyAny>) -> Self {
        if let Ok(document) = arg.cast::<PySodaDoc>() {
            DocumentArg::Document(document)
        } else if is_structured_literal(arg) {
            DocumentArg::Literal(arg)
        } else {
            DocumentArg::Invalid(arg)
        }
    }
}

fn is_structured_literal(arg: &Bound<'_, PyAny>) -> bool {
    arg.is_instance_of::<PyDict>() || arg.is_instance_of::<PyList>()
}

fn json_dumps<'py>(value: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    let py = value.py();
    py.import("json")?.getattr("dumps")?.call1((value,))
}

fn encode_text_or_bytes<'a>(value: &'a Bound<'_, PyAny>) -> BridgeResult<Buffer<'a>> {
    if let Ok(text) = value.cast::<PyString>() {
        return Ok(Buffer::encode(text.to_str()?, DEFAULT_ENCODING)?);
    }
    if let Ok(bytes) = value.cast::<PyBytes>() {
        return Ok(Buffer::from_bytes(bytes.as_bytes()));
    }
    let message = format!(
        "expecting string or bytes object, got {}",
        qualified_type_name(value)?
    );
    Err(NativeError::type_mismatch(message).into())
}

/// Convert a JSON argument to UTF-8 bytes.
///
/// Strings and bytes are borrowed from `arg`. Dictionaries and lists are
/// serialized first; the serialized string is released before returning,
/// whether or not encoding succeeded.
pub fn normalize_json_argument<'a>(arg: &'a Bound<'_, PyAny>) -> BridgeResult<Buffer<'a>> {
    if !is_structured_literal(arg) {
        return encode_text_or_bytes(arg);
    }
    let serialized = json_dumps(arg)?;
    let buffer = encode_text_or_bytes(&serialized)?.into_owned();
    Ok(buffer)
}

/// Convert a document argument to an owned document reference.
///
/// An existing document gains one native reference. A dictionary or list
/// becomes a new document with no key and no media type; the serialized
/// text and its buffer are released before returning on every path.
pub fn normalize_document_argument(
    database: &SodaDatabase,
    arg: &Bound<'_, PyAny>,
) -> BridgeResult<SodaDocument> {
    match DocumentArg::classify(arg) {
        DocumentArg::Document(document) => Ok(document.get().document().try_clone()?),
        DocumentArg::Literal(value) => {
            let serialized = json_dumps(value)?;
            let text = serialized.cast::<PyString>().map_err(PyErr::from)?.to_str()?;
            debug!(len = text.len(), "creating document from literal");
            Ok(database.create_json_document(text)?)
        }
        DocumentArg::Invalid(_) => Err(NativeError::type_mismatch(
            "value must be a SODA document or a dictionary or list",
        )
        .into()),
    }
}
