//! Native client context lifecycle.
//!
//! The native context is created at most once per [`ContextLifecycle`]
//! (and the host keeps one lifecycle per process). Creation is deferred to
//! the first operation that needs it, so environment set up by the host
//! before that point still applies.
//!
//! # Concurrency
//!
//! Callers are expected to serialize the first initializing call. The
//! handle lives in a `OnceLock`, so a lost race cannot corrupt state: the
//! losing caller destroys the context it created and behaves as if the
//! context already existed. After initialization the context is read-only.

use std::fmt;
use std::sync::{Arc, OnceLock};

use tracing::{debug, info, warn};

use crate::config::ContextCreateParams;
use crate::document::SodaDatabase;
use crate::error::{NativeError, NativeResult};
use crate::native::{NativeClient, RawContext, VersionInfo};

const ALREADY_INITIALIZED: &str = "Oracle Client library has already been initialized";

/// An initialized native context and the version captured with it
pub struct ClientContext {
    client: Arc<dyn NativeClient>,
    handle: RawContext,
    version: VersionInfo,
    params: ContextCreateParams,
}

impl ClientContext {
    /// Raw context handle
    pub fn handle(&self) -> RawContext {
        self.handle
    }

    /// Client version captured right after creation
    pub fn client_version(&self) -> VersionInfo {
        self.version
    }

    /// Effective parameters the context was created with
    pub fn params(&self) -> &ContextCreateParams {
        &self.params
    }

    /// Open the document-store database for this context
    pub fn open_database(&self) -> NativeResult<SodaDatabase> {
        let raw = self.client.open_database(self.handle)?;
        Ok(SodaDatabase::from_raw(Arc::clone(&self.client), raw))
    }
}

impl fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientContext")
            .field("handle", &self.handle)
            .field("version", &self.version)
            .finish()
    }
}

/// Once-only owner of the native client context
pub struct ContextLifecycle {
    client: Arc<dyn NativeClient>,
    context: OnceLock<ClientContext>,
}

impl ContextLifecycle {
    /// Create an uninitialized lifecycle for a native client
    pub fn new(client: Arc<dyn NativeClient>) -> Self {
        Self {
            client,
            context: OnceLock::new(),
        }
    }

    /// Make sure the native context exists.
    ///
    /// With `None` this is a no-op once the context exists, which is what
    /// implicit call sites (database creation, version queries) rely on.
    /// Explicit parameters are one-shot: passing them after the context
    /// exists is a configuration error. A failed creation leaves the
    /// lifecycle uninitialized, so a later call may retry.
    pub fn initialize(&self, params: Option<&ContextCreateParams>) -> NativeResult<&ClientContext> {
        if let Some(context) = self.context.get() {
            return Self::existing(context, params);
        }

        let effective = ContextCreateParams::effective(params);
        let handle = self.client.create_context(&effective)?;
        let version = match self.client.client_version(handle) {
            Ok(version) => version,
            Err(info) => {
                warn!(error = %info, "client version unavailable, destroying new context");
                self.client.destroy_context(handle);
                return Err(info.into());
            }
        };

        let client = Arc::clone(&self.client);
        let stored = self.context.get_or_init(move || ClientContext {
            client,
            handle,
            version,
            params: effective,
        });
        if stored.handle != handle {
            debug!("lost initialization race, destroying duplicate context");
            self.client.destroy_context(handle);
            return Self::existing(stored, params);
        }

        info!(
            client_version = %stored.version,
            driver_name = stored.params.driver_name.as_deref().unwrap_or_default(),
            "native client context created"
        );
        Ok(stored)
    }

    fn existing<'a>(
        context: &'a ClientContext,
        params: Option<&ContextCreateParams>,
    ) -> NativeResult<&'a ClientContext> {
        match params {
            None => Ok(context),
            Some(_) => Err(NativeError::configuration(ALREADY_INITIALIZED)),
        }
    }

    /// Whether the context has been created
    pub fn is_initialized(&self) -> bool {
        self.context.get().is_some()
    }

    /// The context, if created
    pub fn get(&self) -> Option<&ClientContext> {
        self.context.get()
    }
}

impl fmt::Debug for ContextLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextLifecycle")
            .field("context", &self.context.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorInfo;
    use crate::memory::{Fault, InMemoryClient};
    use pretty_assertions::assert_eq;

    fn lifecycle() -> (Arc<InMemoryClient>, ContextLifecycle) {
        let client = Arc::new(InMemoryClient::new());
        let lifecycle = ContextLifecycle::new(client.clone());
        (client, lifecycle)
    }

    #[test]
    fn test_initialize_once() {
        let (client, lifecycle) = lifecycle();
        assert!(!lifecycle.is_initialized());
        lifecycle.initialize(None).unwrap();
        assert!(lifecycle.is_initialized());
        assert_eq!(client.contexts_created(), 1);
    }

    #[test]
    fn test_second_explicit_initialize_fails() {
        let (client, lifecycle) = lifecycle();
        let params = ContextCreateParams::default();
        lifecycle.initialize(Some(&params)).unwrap();
        let err = lifecycle.initialize(Some(&params)).unwrap_err();
        assert_eq!(err, NativeError::configuration(ALREADY_INITIALIZED));
        assert_eq!(client.contexts_created(), 1);
    }

    #[test]
    fn test_parameterless_initialize_is_noop() {
        let (client, lifecycle) = lifecycle();
        let first = lifecycle.initialize(None).unwrap().handle();
        let second = lifecycle.initialize(None).unwrap().handle();
        assert_eq!(first, second);
        assert_eq!(client.contexts_created(), 1);
    }

    #[test]
    fn test_create_failure_allows_retry() {
        let (client, lifecycle) = lifecycle();
        client.fail_next(Fault::CreateContext, ErrorInfo::new(1047, "DPI-1047: no client"));
        let err = lifecycle.initialize(None).unwrap_err();
        assert_eq!(err.error_info().map(|i| i.code), Some(1047));
        assert!(!lifecycle.is_initialized());

        lifecycle.initialize(None).unwrap();
        assert!(lifecycle.is_initialized());
    }

    #[test]
    fn test_version_failure_destroys_context() {
        let (client, lifecycle) = lifecycle();
        client.fail_next(Fault::ClientVersion, ErrorInfo::new(1, "no version"));
        assert!(lifecycle.initialize(None).is_err());
        assert!(!lifecycle.is_initialized());
        assert_eq!(client.contexts_created(), 1);
        assert_eq!(client.contexts_destroyed(), 1);
        assert_eq!(client.live_contexts(), 0);
    }

    #[test]
    fn test_effective_params_reach_native_call() {
        let (client, lifecycle) = lifecycle();
        let params = ContextCreateParams {
            encoding: Some("AL32UTF8".to_string()),
            config_dir: Some("/etc/oracle".to_string()),
            ..ContextCreateParams::default()
        };
        let context = lifecycle.initialize(Some(&params)).unwrap();
        let seen = client.last_context_params().unwrap();
        assert_eq!(seen.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(seen.config_dir.as_deref(), Some("/etc/oracle"));
        assert_eq!(context.params(), &seen);
    }
}
