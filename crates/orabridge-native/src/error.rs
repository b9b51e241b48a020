//! Native Error Types
//!
//! This module provides the error types shared by every native operation.
//!
//! ## Error Categories
//!
//! - Configuration errors (re-initialization with new parameters)
//! - Native library errors (carrying the library's structured error info)
//! - Type mismatches (an argument of an unsupported shape)
//! - Encoding errors (an encoding the boundary cannot produce)

use std::fmt;

use smol_str::SmolStr;
use thiserror::Error;

/// Result type for native operations
pub type NativeResult<T> = Result<T, NativeError>;

/// Structured error information reported by the native client library.
///
/// The library reports failures out-of-band rather than through return
/// values; this is the owned copy taken at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
    /// Library error code (e.g. the ORA-xxxxx number)
    pub code: i32,
    /// Parse error offset, if any
    pub offset: u32,
    /// Full error message
    pub message: String,
    /// Name of the native function that failed
    pub fn_name: SmolStr,
    /// Action that was being performed
    pub action: SmolStr,
    /// Five character SQL state
    pub sql_state: SmolStr,
    /// Whether retrying the operation may succeed
    pub is_recoverable: bool,
}

impl ErrorInfo {
    /// Create error info with a code and message
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            ..Self::default()
        }
    }

    /// Record the native function and action that failed
    pub fn with_origin(mut self, fn_name: &str, action: &str) -> Self {
        self.fn_name = SmolStr::new(fn_name);
        self.action = SmolStr::new(action);
        self
    }
}

impl fmt::Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)?;
        if !self.fn_name.is_empty() {
            write!(f, " ({}: {})", self.fn_name, self.action)?;
        }
        Ok(())
    }
}

/// Native boundary error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NativeError {
    /// Attempt to change one-shot configuration after it took effect
    #[error("{message}")]
    Configuration {
        /// Description of the misuse
        message: String,
    },

    /// The native client library reported a failure
    #[error("{0}")]
    Native(ErrorInfo),

    /// An argument was not of a supported shape
    #[error("{message}")]
    TypeMismatch {
        /// Description of the expected shapes
        message: String,
    },

    /// Text could not be encoded with the requested encoding
    #[error("unsupported encoding: {encoding}")]
    UnsupportedEncoding {
        /// Encoding name after byte-order resolution
        encoding: SmolStr,
    },
}

impl NativeError {
    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        NativeError::Configuration {
            message: message.into(),
        }
    }

    /// Create a type mismatch error
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        NativeError::TypeMismatch {
            message: message.into(),
        }
    }

    /// Create an unsupported encoding error
    pub fn unsupported_encoding(encoding: &str) -> Self {
        NativeError::UnsupportedEncoding {
            encoding: SmolStr::new(encoding),
        }
    }

    /// Native error info, if this error came from the client library
    pub fn error_info(&self) -> Option<&ErrorInfo> {
        match self {
            NativeError::Native(info) => Some(info),
            _ => None,
        }
    }
}

impl From<ErrorInfo> for NativeError {
    fn from(info: ErrorInfo) -> Self {
        NativeError::Native(info)
    }
}
