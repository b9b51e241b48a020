//! Native side of the orabridge database boundary.
//!
//! This crate owns everything that talks to the native database-client
//! library:
//! - `ContextLifecycle` - once-only creation of the process-wide client context
//! - `resolve_encoding` - byte-order resolution of encoding names
//! - `Buffer` - encoded bytes handed to native calls
//! - `SodaDatabase` / `SodaDocument` - reference-counted native handles
//! - `NativeClient` - the calls made into the client library
//!
//! The `in-memory` feature adds `InMemoryClient`, a simulated client library
//! with failure injection, used by the test suites.

pub mod buffer;
pub mod config;
pub mod context;
pub mod document;
pub mod encoding;
pub mod error;
#[cfg(any(test, feature = "in-memory"))]
pub mod memory;
pub mod native;

pub use buffer::Buffer;
pub use config::{ConfigError, ContextCreateParams};
pub use context::{ClientContext, ContextLifecycle};
pub use document::{SodaDatabase, SodaDocument};
pub use encoding::resolve_encoding;
pub use error::{ErrorInfo, NativeError, NativeResult};
#[cfg(any(test, feature = "in-memory"))]
pub use memory::{Fault, InMemoryClient};
pub use native::{
    DocumentContent, NativeClient, RawContext, RawDatabase, RawDocument, VersionInfo,
};
