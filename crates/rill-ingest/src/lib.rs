#![doc = include_str!("../README.md")]

mod error;
mod merge;
mod multi;
mod reconcile;
mod validate;

pub use error::{DecodeError, IngestError};
pub use merge::{parse_merged, parse_sources};
pub use multi::MultiError;
pub use reconcile::{ListDecoder, ObjectDecoder, decode_list};
pub use rill_parse::{Body, Document, Entry, ParseError, Value};
pub use validate::check_keys;
