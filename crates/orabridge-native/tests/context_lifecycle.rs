//! Once-only initialization of the native client context.

use std::sync::Arc;

use orabridge_native::config::{DEFAULT_DRIVER_NAME, DEFAULT_LOAD_ERROR_URL};
use orabridge_native::{
    ContextCreateParams, ContextLifecycle, ErrorInfo, Fault, InMemoryClient, NativeError,
    VersionInfo,
};
use pretty_assertions::assert_eq;

fn param_sets() -> Vec<ContextCreateParams> {
    vec![
        ContextCreateParams::default(),
        ContextCreateParams {
            driver_name: Some("reporting : 3.0".to_string()),
            ..ContextCreateParams::default()
        },
        ContextCreateParams {
            encoding: Some("UTF-16".to_string()),
            lib_dir: Some("/opt/oracle/instantclient".to_string()),
            config_dir: Some("/etc/oracle".to_string()),
            load_error_url: Some("https://intranet/help".to_string()),
            soda_use_json_desc: true,
            use_json_id: true,
            ..ContextCreateParams::default()
        },
    ]
}

#[test]
fn test_second_initialize_with_params_always_fails() {
    for params in param_sets() {
        let client = Arc::new(InMemoryClient::new());
        let lifecycle = ContextLifecycle::new(client.clone());
        lifecycle.initialize(Some(&params)).unwrap();

        let err = lifecycle.initialize(Some(&params)).unwrap_err();
        assert!(matches!(err, NativeError::Configuration { .. }));
        assert_eq!(
            err.to_string(),
            "Oracle Client library has already been initialized"
        );
        assert_eq!(client.contexts_created(), 1);
    }
}

#[test]
fn test_parameterless_calls_keep_cached_version() {
    let version = VersionInfo {
        version_num: 21,
        release_num: 3,
        update_num: 0,
        port_release_num: 0,
        port_update_num: 0,
        full_version_num: 2_103_000_000,
    };
    let client = Arc::new(InMemoryClient::with_version(version));
    let lifecycle = ContextLifecycle::new(client.clone());
    lifecycle
        .initialize(Some(&ContextCreateParams::default()))
        .unwrap();

    for _ in 0..5 {
        let context = lifecycle.initialize(None).unwrap();
        assert_eq!(context.client_version(), version);
    }
    assert_eq!(client.contexts_created(), 1);
}

#[test]
fn test_encoding_forced_for_every_param_set() {
    for params in param_sets() {
        let client = Arc::new(InMemoryClient::new());
        let lifecycle = ContextLifecycle::new(client.clone());
        lifecycle.initialize(Some(&params)).unwrap();

        let seen = client.last_context_params().unwrap();
        assert_eq!(seen.encoding.as_deref(), Some("UTF-8"));
        assert_eq!(seen.lib_dir, params.lib_dir);
        assert_eq!(seen.config_dir, params.config_dir);
        assert_eq!(seen.use_json_id, params.use_json_id);
    }
}

#[test]
fn test_fallbacks_only_fill_unset_fields() {
    let client = Arc::new(InMemoryClient::new());
    let lifecycle = ContextLifecycle::new(client.clone());
    lifecycle.initialize(None).unwrap();

    let seen = client.last_context_params().unwrap();
    assert_eq!(seen.driver_name.as_deref(), Some(DEFAULT_DRIVER_NAME));
    assert_eq!(seen.load_error_url.as_deref(), Some(DEFAULT_LOAD_ERROR_URL));
}

#[test]
fn test_failed_creation_leaves_lifecycle_uninitialized() {
    let client = Arc::new(InMemoryClient::new());
    let lifecycle = ContextLifecycle::new(client.clone());
    client.fail_next(
        Fault::CreateContext,
        ErrorInfo::new(0, "DPI-1047: Cannot locate a 64-bit Oracle Client library"),
    );

    let params = ContextCreateParams::default();
    let err = lifecycle.initialize(Some(&params)).unwrap_err();
    assert!(err.to_string().starts_with("DPI-1047"));
    assert!(lifecycle.get().is_none());

    // explicit parameters are still accepted after a failed attempt
    lifecycle.initialize(Some(&params)).unwrap();
    assert!(lifecycle.is_initialized());
}

#[test]
fn test_version_failure_leaks_no_context() {
    let client = Arc::new(InMemoryClient::new());
    let lifecycle = ContextLifecycle::new(client.clone());
    client.fail_next(Fault::ClientVersion, ErrorInfo::new(0, "DPI-1050: version"));

    assert!(lifecycle.initialize(None).is_err());
    assert_eq!(client.live_contexts(), 0);
    assert_eq!(client.invalid_releases(), 0);

    lifecycle.initialize(None).unwrap();
    assert_eq!(client.live_contexts(), 1);
}

#[test]
fn test_concurrent_readers_after_initialization() {
    let client = Arc::new(InMemoryClient::new());
    let lifecycle = Arc::new(ContextLifecycle::new(client.clone()));
    let handle = lifecycle.initialize(None).unwrap().handle();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let lifecycle = Arc::clone(&lifecycle);
            std::thread::spawn(move || lifecycle.initialize(None).unwrap().handle())
        })
        .collect();
    for reader in readers {
        assert_eq!(reader.join().unwrap(), handle);
    }
    assert_eq!(client.contexts_created(), 1);
}
