//! Encoding name resolution.
//!
//! The native library assumes native byte order for UTF-16 and does not
//! accept a byte order mark, so the byte-order-ambiguous name has to be
//! rewritten before any text is encoded for it.

/// Byte-order-ambiguous UTF-16 name
pub const UTF16: &str = "UTF-16";

/// Little-endian UTF-16 name
pub const UTF16_LE: &str = "UTF-16LE";

/// Big-endian UTF-16 name
pub const UTF16_BE: &str = "UTF-16BE";

const HOST_IS_LITTLE_ENDIAN: bool = u32::from_ne_bytes([0, 1, 2, 3]) == 0x0302_0100;

/// Resolve an encoding name to the variant the native library expects.
///
/// Only `"UTF-16"` is rewritten; any other name, and `None`, is returned
/// unchanged.
pub fn resolve_encoding(name: Option<&str>) -> Option<&str> {
    match name {
        Some(UTF16) => Some(native_utf16()),
        other => other,
    }
}

/// Explicit UTF-16 variant for the host byte order
pub fn native_utf16() -> &'static str {
    if HOST_IS_LITTLE_ENDIAN {
        UTF16_LE
    } else {
        UTF16_BE
    }
}
