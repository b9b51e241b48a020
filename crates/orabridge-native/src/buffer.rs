//! Byte buffers handed to the native library.
//!
//! A [`Buffer`] either borrows bytes that already have the right
//! representation or owns bytes produced by encoding. Owned storage is
//! released when the buffer is dropped, on every exit path.

use std::borrow::Cow;

use crate::encoding::{resolve_encoding, UTF16_BE, UTF16_LE};
use crate::error::{NativeError, NativeResult};

/// Pointer and length view over bytes destined for the native library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer<'a> {
    bytes: Cow<'a, [u8]>,
}

impl<'a> Buffer<'a> {
    /// Borrow bytes as-is
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        Self {
            bytes: Cow::Borrowed(bytes),
        }
    }

    /// Encode text with the named encoding.
    ///
    /// UTF-8 borrows the text. `UTF-16` is resolved to the host byte order
    /// and never carries a byte order mark.
    pub fn encode(text: &'a str, encoding: &str) -> NativeResult<Self> {
        let encoding = resolve_encoding(Some(encoding)).unwrap_or(encoding);
        if encoding.eq_ignore_ascii_case("UTF-8") || encoding.eq_ignore_ascii_case("UTF8") {
            return Ok(Self::from_bytes(text.as_bytes()));
        }
        let bytes: Vec<u8> = if encoding.eq_ignore_ascii_case(UTF16_LE) {
            text.encode_utf16().flat_map(u16::to_le_bytes).collect()
        } else if encoding.eq_ignore_ascii_case(UTF16_BE) {
            text.encode_utf16().flat_map(u16::to_be_bytes).collect()
        } else {
            return Err(NativeError::unsupported_encoding(encoding));
        };
        Ok(Self {
            bytes: Cow::Owned(bytes),
        })
    }

    /// The encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pointer to the first byte
    pub fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr()
    }

    /// Number of bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the buffer holds no bytes
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the buffer owns its storage
    pub fn is_owned(&self) -> bool {
        matches!(self.bytes, Cow::Owned(_))
    }

    /// Detach from the source, copying borrowed bytes
    pub fn into_owned(self) -> Buffer<'static> {
        Buffer {
            bytes: Cow::Owned(self.bytes.into_owned()),
        }
    }
}
