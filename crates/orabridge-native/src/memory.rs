//! In-memory native client.
//!
//! Simulates contexts, databases and reference-counted documents without a
//! client library. Every native call can be made to fail once (or several
//! times) with chosen error info, and counters expose what was created,
//! destroyed and still outstanding.

use std::collections::{HashMap, HashSet};
use std::ffi::c_void;

use parking_lot::Mutex;
use tracing::warn;

use crate::config::ContextCreateParams;
use crate::error::ErrorInfo;
use crate::native::{
    DocumentContent, NativeClient, RawContext, RawDatabase, RawDocument, VersionInfo,
};

/// Native calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    CreateContext,
    ClientVersion,
    OpenDatabase,
    CreateDocument,
    AddDocumentRef,
    DocumentContent,
}

#[derive(Debug)]
struct DocumentRecord {
    refs: u32,
    content: DocumentContent,
}

#[derive(Debug, Default)]
struct State {
    next_id: usize,
    contexts: HashSet<usize>,
    databases: HashMap<usize, u32>,
    documents: HashMap<usize, DocumentRecord>,
    // Templates stay in place so that triggering a fault allocates and
    // frees symmetrically.
    faults: HashMap<Fault, (ErrorInfo, u32)>,
    last_params: Option<ContextCreateParams>,
    contexts_created: usize,
    contexts_destroyed: usize,
    documents_created: usize,
    invalid_releases: usize,
}

impl State {
    fn allocate_id(&mut self) -> usize {
        self.next_id += 1;
        0x1000 + self.next_id * 16
    }

    fn trigger(&mut self, fault: Fault) -> Result<(), ErrorInfo> {
        match self.faults.get_mut(&fault) {
            Some((info, remaining)) if *remaining > 0 => {
                *remaining -= 1;
                Err(info.clone())
            }
            _ => Ok(()),
        }
    }
}

fn handle_ptr(id: usize) -> *mut c_void {
    id as *mut c_void
}

fn unknown_handle(fn_name: &str) -> ErrorInfo {
    ErrorInfo::new(0, "DPI-1002: invalid handle").with_origin(fn_name, "check handle")
}

/// Native client that keeps everything in process memory
#[derive(Debug, Default)]
pub struct InMemoryClient {
    version: VersionInfo,
    state: Mutex<State>,
}

impl InMemoryClient {
    /// Create a client reporting version 19.8.0.0.0
    pub fn new() -> Self {
        Self::with_version(VersionInfo {
            version_num: 19,
            release_num: 8,
            update_num: 0,
            port_release_num: 0,
            port_update_num: 0,
            full_version_num: 1_908_000_000,
        })
    }

    /// Create a client reporting the given version
    pub fn with_version(version: VersionInfo) -> Self {
        Self {
            version,
            state: Mutex::new(State::default()),
        }
    }

    /// Make the next call of `fault` fail with `info`
    pub fn fail_next(&self, fault: Fault, info: ErrorInfo) {
        self.fail_times(fault, info, 1);
    }

    /// Make the next `times` calls of `fault` fail with `info`
    pub fn fail_times(&self, fault: Fault, info: ErrorInfo, times: u32) {
        self.state.lock().faults.insert(fault, (info, times));
    }

    pub fn contexts_created(&self) -> usize {
        self.state.lock().contexts_created
    }

    pub fn contexts_destroyed(&self) -> usize {
        self.state.lock().contexts_destroyed
    }

    pub fn live_contexts(&self) -> usize {
        self.state.lock().contexts.len()
    }

    pub fn live_databases(&self) -> usize {
        self.state.lock().databases.len()
    }

    pub fn documents_created(&self) -> usize {
        self.state.lock().documents_created
    }

    pub fn live_documents(&self) -> usize {
        self.state.lock().documents.len()
    }

    /// Releases of handles that were not live
    pub fn invalid_releases(&self) -> usize {
        self.state.lock().invalid_releases
    }

    /// Current native reference count of a document
    pub fn ref_count(&self, document: RawDocument) -> Option<u32> {
        let id = document.as_ptr() as usize;
        self.state.lock().documents.get(&id).map(|record| record.refs)
    }

    /// Parameters passed to the most recent context creation
    pub fn last_context_params(&self) -> Option<ContextCreateParams> {
        self.state.lock().last_params.clone()
    }
}

impl NativeClient for InMemoryClient {
    fn create_context(&self, params: &ContextCreateParams) -> Result<RawContext, ErrorInfo> {
        let mut state = self.state.lock();
        state.last_params = Some(params.clone());
        state.trigger(Fault::CreateContext)?;
        let id = state.allocate_id();
        state.contexts.insert(id);
        state.contexts_created += 1;
        RawContext::new(handle_ptr(id)).ok_or_else(|| unknown_handle("create_context"))
    }

    fn client_version(&self, context: RawContext) -> Result<VersionInfo, ErrorInfo> {
        let mut state = self.state.lock();
        state.trigger(Fault::ClientVersion)?;
        if !state.contexts.contains(&(context.as_ptr() as usize)) {
            return Err(unknown_handle("client_version"));
        }
        Ok(self.version)
    }

    fn destroy_context(&self, context: RawContext) {
        let mut state = self.state.lock();
        if state.contexts.remove(&(context.as_ptr() as usize)) {
            state.contexts_destroyed += 1;
        } else {
            warn!(?context, "destroying unknown context");
            state.invalid_releases += 1;
        }
    }

    fn open_database(&self, context: RawContext) -> Result<RawDatabase, ErrorInfo> {
        let mut state = self.state.lock();
        state.trigger(Fault::OpenDatabase)?;
        if !state.contexts.contains(&(context.as_ptr() as usize)) {
            return Err(unknown_handle("open_database"));
        }
        let id = state.allocate_id();
        state.databases.insert(id, 1);
        RawDatabase::new(handle_ptr(id)).ok_or_else(|| unknown_handle("open_database"))
    }

    fn release_database(&self, database: RawDatabase) {
        let mut state = self.state.lock();
        let id = database.as_ptr() as usize;
        match state.databases.get_mut(&id) {
            Some(refs) if *refs > 1 => *refs -= 1,
            Some(_) => {
                state.databases.remove(&id);
            }
            None => {
                warn!(?database, "releasing unknown database");
                state.invalid_releases += 1;
            }
        }
    }

    fn create_document(
        &self,
        database: RawDatabase,
        key: Option<&[u8]>,
        content: &[u8],
        media_type: Option<&[u8]>,
        _flags: u32,
    ) -> Result<RawDocument, ErrorInfo> {
        let mut state = self.state.lock();
        state.trigger(Fault::CreateDocument)?;
        if !state.databases.contains_key(&(database.as_ptr() as usize)) {
            return Err(unknown_handle("create_document"));
        }
        let id = state.allocate_id();
        state.documents.insert(
            id,
            DocumentRecord {
                refs: 1,
                content: DocumentContent {
                    key: key.map(<[u8]>::to_vec),
                    content: content.to_vec(),
                    media_type: media_type.map(<[u8]>::to_vec),
                },
            },
        );
        state.documents_created += 1;
        RawDocument::new(handle_ptr(id)).ok_or_else(|| unknown_handle("create_document"))
    }

    fn add_document_ref(&self, document: RawDocument) -> Result<(), ErrorInfo> {
        let mut state = self.state.lock();
        state.trigger(Fault::AddDocumentRef)?;
        match state.documents.get_mut(&(document.as_ptr() as usize)) {
            Some(record) => {
                record.refs += 1;
                Ok(())
            }
            None => Err(unknown_handle("add_document_ref")),
        }
    }

    fn release_document(&self, document: RawDocument) {
        let mut state = self.state.lock();
        let id = document.as_ptr() as usize;
        match state.documents.get_mut(&id) {
            Some(record) if record.refs > 1 => record.refs -= 1,
            Some(_) => {
                state.documents.remove(&id);
            }
            None => {
                warn!(?document, "releasing unknown document");
                state.invalid_releases += 1;
            }
        }
    }

    fn document_content(&self, document: RawDocument) -> Result<DocumentContent, ErrorInfo> {
        let mut state = self.state.lock();
        state.trigger(Fault::DocumentContent)?;
        state
            .documents
            .get(&(document.as_ptr() as usize))
            .map(|record| record.content.clone())
            .ok_or_else(|| unknown_handle("document_content"))
    }
}
