#![doc = include_str!("../README.md")]

mod error;
mod json;

pub use error::CodecError;
pub use json::{decode, decode_from_reader, encode, encode_pretty, encode_to_writer};
