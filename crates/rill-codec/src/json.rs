//! JSON encode/decode helpers.
//!
//! Thin wrappers over serde_json with two contract points the rest of
//! the system relies on: absent inputs are errors (a top-level `null`
//! does not encode, empty bytes do not decode), and numbers keep their
//! source digits end to end (the `arbitrary_precision` feature) instead
//! of being squeezed through an f64.

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::CodecError;

/// Encode a value as compact JSON.
pub fn encode<T>(value: &T) -> Result<Vec<u8>, CodecError>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(value)?;
    if bytes == b"null".as_slice() {
        return Err(CodecError::NullInput);
    }
    Ok(bytes)
}

/// Encode a value as JSON indented with four spaces.
pub fn encode_pretty<T>(value: &T) -> Result<Vec<u8>, CodecError>
where
    T: Serialize + ?Sized,
{
    let mut out = Vec::new();
    encode_to_writer(&mut out, value, Some("    "))?;
    Ok(out)
}

/// Encode a value as JSON to a writer, pretty-printed with the given
/// indent when one is supplied.
pub fn encode_to_writer<W, T>(mut writer: W, value: &T, indent: Option<&str>) -> Result<(), CodecError>
where
    W: Write,
    T: Serialize + ?Sized,
{
    // Buffer first so the null check sees the whole output before any
    // bytes reach the writer.
    let bytes = match indent {
        Some(indent) => {
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut out = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
            value.serialize(&mut serializer)?;
            out
        }
        None => serde_json::to_vec(value)?,
    };
    if bytes == b"null".as_slice() {
        return Err(CodecError::NullInput);
    }
    writer.write_all(&bytes)?;
    Ok(())
}

/// Decode a value from JSON bytes.
pub fn decode<T>(data: &[u8]) -> Result<T, CodecError>
where
    T: DeserializeOwned,
{
    if data.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    Ok(serde_json::from_slice(data)?)
}

/// Decode a value from a reader of JSON bytes.
pub fn decode_from_reader<R, T>(reader: R) -> Result<T, CodecError>
where
    R: Read,
    T: DeserializeOwned,
{
    Ok(serde_json::from_reader(reader)?)
}
