//! Reference-counted document-store handles.
//!
//! Each wrapper owns exactly one native reference: cloning is the native
//! add-ref and dropping is the native release, so a handle can never be
//! leaked or released twice by boundary code.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::buffer::Buffer;
use crate::config::DEFAULT_ENCODING;
use crate::error::NativeResult;
use crate::native::{DocumentContent, NativeClient, RawDatabase, RawDocument, SODA_FLAGS_DEFAULT};

/// Owned reference to a document-store database
pub struct SodaDatabase {
    client: Arc<dyn NativeClient>,
    raw: RawDatabase,
}

impl SodaDatabase {
    /// Adopt one native reference to a database
    pub fn from_raw(client: Arc<dyn NativeClient>, raw: RawDatabase) -> Self {
        Self { client, raw }
    }

    /// Raw database handle, valid while `self` lives
    pub fn raw(&self) -> RawDatabase {
        self.raw
    }

    /// Create a document from raw content
    pub fn create_document(
        &self,
        content: &[u8],
        key: Option<&[u8]>,
        media_type: Option<&[u8]>,
    ) -> NativeResult<SodaDocument> {
        let raw = self
            .client
            .create_document(self.raw, key, content, media_type, SODA_FLAGS_DEFAULT)?;
        debug!(document = ?raw, len = content.len(), "document created");
        Ok(SodaDocument::from_raw(Arc::clone(&self.client), raw))
    }

    /// Create a document from serialized JSON text, with no key and no
    /// media type.
    ///
    /// The UTF-8 buffer is released before returning on both success and
    /// failure.
    pub fn create_json_document(&self, text: &str) -> NativeResult<SodaDocument> {
        let buffer = Buffer::encode(text, DEFAULT_ENCODING)?;
        self.create_document(buffer.as_bytes(), None, None)
    }
}

impl Drop for SodaDatabase {
    fn drop(&mut self) {
        self.client.release_database(self.raw);
    }
}

impl fmt::Debug for SodaDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SodaDatabase({:?})", self.raw)
    }
}

/// Owned reference to a document
pub struct SodaDocument {
    client: Arc<dyn NativeClient>,
    raw: RawDocument,
}

impl SodaDocument {
    /// Adopt one native reference to a document
    pub fn from_raw(client: Arc<dyn NativeClient>, raw: RawDocument) -> Self {
        Self { client, raw }
    }

    /// Raw document handle, valid while `self` lives
    pub fn raw(&self) -> RawDocument {
        self.raw
    }

    /// Take another native reference to the same document
    pub fn try_clone(&self) -> NativeResult<Self> {
        self.client.add_document_ref(self.raw)?;
        debug!(document = ?self.raw, "document reference added");
        Ok(Self {
            client: Arc::clone(&self.client),
            raw: self.raw,
        })
    }

    /// Copy out key, content and media type
    pub fn content(&self) -> NativeResult<DocumentContent> {
        Ok(self.client.document_content(self.raw)?)
    }
}

impl Drop for SodaDocument {
    fn drop(&mut self) {
        debug!(document = ?self.raw, "document reference released");
        self.client.release_document(self.raw);
    }
}

impl PartialEq for SodaDocument {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for SodaDocument {}

impl fmt::Debug for SodaDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SodaDocument({:?})", self.raw)
    }
}
