//! Error type for codec operations.

use std::fmt;
use std::io;

/// Error from encoding or decoding JSON.
#[derive(Debug)]
pub enum CodecError {
    /// The value serialized to a top-level `null`; encoding an absent
    /// value is an error, not a no-op.
    NullInput,
    /// There were no bytes to decode.
    EmptyInput,
    /// The JSON layer rejected the data.
    Json(serde_json::Error),
    /// The destination writer failed.
    Io(io::Error),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::NullInput => write!(f, "input for encoding is null"),
            CodecError::EmptyInput => write!(f, "data being decoded is empty"),
            CodecError::Json(e) => write!(f, "{}", e),
            CodecError::Io(e) => write!(f, "failed to write encoded JSON: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Json(e) => Some(e),
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e)
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        CodecError::Io(e)
    }
}
