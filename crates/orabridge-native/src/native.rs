//! Native Client Interface
//!
//! The native database-client library is an external collaborator. This
//! module defines the narrow set of calls the boundary makes into it, and
//! the opaque handle types those calls exchange.
//!
//! ## Handles
//!
//! Handles are non-null opaque pointers owned by the native library. They
//! are only ever exposed wrapped: the context by [`ClientContext`], documents
//! by [`SodaDocument`], databases by [`SodaDatabase`].
//!
//! [`ClientContext`]: crate::context::ClientContext
//! [`SodaDocument`]: crate::document::SodaDocument
//! [`SodaDatabase`]: crate::document::SodaDatabase

use std::ffi::c_void;
use std::fmt;
use std::ptr::NonNull;

use crate::config::ContextCreateParams;
use crate::error::ErrorInfo;

/// Major version of the native interface this boundary is written against
pub const NATIVE_MAJOR_VERSION: u32 = 4;

/// Minor version of the native interface this boundary is written against
pub const NATIVE_MINOR_VERSION: u32 = 6;

/// Default flags for document-store calls
pub const SODA_FLAGS_DEFAULT: u32 = 0;

macro_rules! opaque_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(transparent)]
        pub struct $name(NonNull<c_void>);

        impl $name {
            /// Wrap a raw handle, rejecting null
            pub fn new(ptr: *mut c_void) -> Option<Self> {
                NonNull::new(ptr).map(Self)
            }

            /// Get the raw pointer
            pub fn as_ptr(self) -> *mut c_void {
                self.0.as_ptr()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({:p})"), self.0)
            }
        }

        // SAFETY: native handles are thread-safe; the library serializes
        // access internally.
        unsafe impl Send for $name {}
        unsafe impl Sync for $name {}
    };
}

opaque_handle!(
    /// Raw native client context handle
    RawContext
);

opaque_handle!(
    /// Raw document-store database handle
    RawDatabase
);

opaque_handle!(
    /// Raw document handle
    RawDocument
);

/// Client library version, captured once after context creation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionInfo {
    pub version_num: i32,
    pub release_num: i32,
    pub update_num: i32,
    pub port_release_num: i32,
    pub port_update_num: i32,
    pub full_version_num: u32,
}

impl VersionInfo {
    /// Version as `(version, release, update, port release, port update)`
    pub fn as_tuple(&self) -> (i32, i32, i32, i32, i32) {
        (
            self.version_num,
            self.release_num,
            self.update_num,
            self.port_release_num,
            self.port_update_num,
        )
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}.{}",
            self.version_num,
            self.release_num,
            self.update_num,
            self.port_release_num,
            self.port_update_num
        )
    }
}

/// Owned copy of a document's key, content and media type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentContent {
    pub key: Option<Vec<u8>>,
    pub content: Vec<u8>,
    pub media_type: Option<Vec<u8>>,
}

/// Calls the boundary makes into the native client library.
///
/// Every call returning `Err` reports the library's error info; the handle
/// arguments are borrowed unless the method says otherwise.
pub trait NativeClient: Send + Sync {
    /// Create a context from fully resolved parameters
    fn create_context(&self, params: &ContextCreateParams) -> Result<RawContext, ErrorInfo>;

    /// Fetch the client library version from a context
    fn client_version(&self, context: RawContext) -> Result<VersionInfo, ErrorInfo>;

    /// Destroy a context, consuming the handle
    fn destroy_context(&self, context: RawContext);

    /// Open the document-store database for a context, returning an owned
    /// reference
    fn open_database(&self, context: RawContext) -> Result<RawDatabase, ErrorInfo>;

    /// Release one reference to a database
    fn release_database(&self, database: RawDatabase);

    /// Create a document from raw content, returning an owned reference
    fn create_document(
        &self,
        database: RawDatabase,
        key: Option<&[u8]>,
        content: &[u8],
        media_type: Option<&[u8]>,
        flags: u32,
    ) -> Result<RawDocument, ErrorInfo>;

    /// Add one reference to a document
    fn add_document_ref(&self, document: RawDocument) -> Result<(), ErrorInfo>;

    /// Release one reference to a document
    fn release_document(&self, document: RawDocument);

    /// Copy out a document's key, content and media type
    fn document_content(&self, document: RawDocument) -> Result<DocumentContent, ErrorInfo>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_rejects_null() {
        assert!(RawDocument::new(std::ptr::null_mut()).is_none());
    }

    #[test]
    fn test_handle_round_trips_pointer() {
        let mut slot = 0u8;
        let ptr = &mut slot as *mut u8 as *mut c_void;
        let handle = RawContext::new(ptr).unwrap();
        assert_eq!(handle.as_ptr(), ptr);
        assert!(format!("{:?}", handle).starts_with("RawContext("));
    }

    #[test]
    fn test_version_display() {
        let version = VersionInfo {
            version_num: 19,
            release_num: 8,
            update_num: 0,
            port_release_num: 0,
            port_update_num: 0,
            full_version_num: 1908000000,
        };
        assert_eq!(version.to_string(), "19.8.0.0.0");
        assert_eq!(version.as_tuple(), (19, 8, 0, 0, 0));
    }
}
