//! Context creation parameters.
//!
//! Parameters can be built in code or read from a TOML file:
//!
//! ```toml
//! driver_name = "my-app : 1.0"
//! lib_dir = "/opt/oracle/instantclient_19_8"
//! config_dir = "/etc/oracle"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The only encoding the boundary hands to the native library
pub const DEFAULT_ENCODING: &str = "UTF-8";

/// Driver name reported to the database when the caller sets none
pub const DEFAULT_DRIVER_NAME: &str = concat!("orabridge : ", env!("CARGO_PKG_VERSION"));

/// Help URL embedded in library load errors when the caller sets none
pub const DEFAULT_LOAD_ERROR_URL: &str = "https://orabridge.readthedocs.io/en/latest/installation.html";

/// Errors reading a parameter file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid client configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Parameters for creating the native client context.
///
/// Unset fields are left to the native library, except the three the
/// boundary resolves itself (see [`ContextCreateParams::effective`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextCreateParams {
    /// Driver name reported to the database
    pub driver_name: Option<String>,
    /// Default character encoding; always overridden with UTF-8
    pub encoding: Option<String>,
    /// URL included in errors raised when the client library cannot load
    pub load_error_url: Option<String>,
    /// Directory the client library is loaded from
    pub lib_dir: Option<String>,
    /// Directory holding network configuration files
    pub config_dir: Option<String>,
    /// Use JSON descriptors for document-store content
    pub soda_use_json_desc: bool,
    /// Use the native JSON id type
    pub use_json_id: bool,
}

impl ContextCreateParams {
    /// Parse parameters from TOML text
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read parameters from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parameters actually passed to context creation.
    ///
    /// The encoding is forced to UTF-8; the driver name and load error URL
    /// fall back to fixed defaults; everything else passes through.
    pub fn effective(params: Option<&ContextCreateParams>) -> ContextCreateParams {
        let mut effective = params.cloned().unwrap_or_default();
        effective.encoding = Some(DEFAULT_ENCODING.to_string());
        effective
            .driver_name
            .get_or_insert_with(|| DEFAULT_DRIVER_NAME.to_string());
        effective
            .load_error_url
            .get_or_insert_with(|| DEFAULT_LOAD_ERROR_URL.to_string());
        effective
    }
}
