//! Process-wide native client context.
//!
//! The context is created lazily by the first operation that needs it, or
//! explicitly by `init_client()`. Explicit initialization must happen before
//! anything else touches the database, since its parameters are one-shot.

use std::sync::{Arc, OnceLock};

use orabridge_native::{
    ClientContext, ContextCreateParams, ContextLifecycle, NativeClient, NativeError, NativeResult,
};
use pyo3::prelude::*;
use tracing::warn;

use crate::error::BridgeError;

static NATIVE_CLIENT: OnceLock<Arc<dyn NativeClient>> = OnceLock::new();
static LIFECYCLE: OnceLock<ContextLifecycle> = OnceLock::new();

/// Install the native client library used by the bindings.
///
/// Must be called before the first context is created; afterwards (or on
/// a second call) the client is handed back unchanged.
pub fn register_native_client(
    client: Arc<dyn NativeClient>,
) -> Result<(), Arc<dyn NativeClient>> {
    if LIFECYCLE.get().is_some() {
        warn!("native client registered after the context was created");
        return Err(client);
    }
    NATIVE_CLIENT.set(client)
}

#[cfg(feature = "in-memory")]
fn default_client() -> Option<Arc<dyn NativeClient>> {
    Some(Arc::new(orabridge_native::InMemoryClient::new()))
}

#[cfg(not(feature = "in-memory"))]
fn default_client() -> Option<Arc<dyn NativeClient>> {
    None
}

/// The process-wide lifecycle, bound to the registered native client
pub fn lifecycle() -> NativeResult<&'static ContextLifecycle> {
    if let Some(lifecycle) = LIFECYCLE.get() {
        return Ok(lifecycle);
    }
    let client = match NATIVE_CLIENT.get() {
        Some(client) => Arc::clone(client),
        None => {
            let client = default_client().ok_or_else(|| {
                NativeError::configuration("no native client library has been registered")
            })?;
            Arc::clone(NATIVE_CLIENT.get_or_init(|| client))
        }
    };
    Ok(LIFECYCLE.get_or_init(|| ContextLifecycle::new(client)))
}

/// Initialize the context with explicit parameters
pub fn initialize(params: Option<&ContextCreateParams>) -> NativeResult<&'static ClientContext> {
    lifecycle()?.initialize(params)
}

/// The context, created with default parameters if it does not exist yet
pub fn context() -> NativeResult<&'static ClientContext> {
    initialize(None)
}

/// Initialize the native client library with explicit settings.
///
/// Raises `ProgrammingError` if the library has already been initialized,
/// whether explicitly or implicitly by an earlier operation.
#[pyfunction]
#[pyo3(signature = (lib_dir=None, config_dir=None, error_url=None, driver_name=None))]
pub fn init_client(
    lib_dir: Option<String>,
    config_dir: Option<String>,
    error_url: Option<String>,
    driver_name: Option<String>,
) -> PyResult<()> {
    let params = ContextCreateParams {
        lib_dir,
        config_dir,
        load_error_url: error_url,
        driver_name,
        ..ContextCreateParams::default()
    };
    initialize(Some(&params)).map_err(BridgeError::from)?;
    Ok(())
}

/// Version of the native client library as a 5-tuple
#[pyfunction]
pub fn client_version() -> PyResult<(i32, i32, i32, i32, i32)> {
    let context = context().map_err(BridgeError::from)?;
    Ok(context.client_version().as_tuple())
}
