//! Error types for the ingestion pipeline.

use std::fmt;
use std::io;

use rill_parse::ParseError;

/// Error produced by a decoder plugin.
///
/// Decoders report failures as plain messages; the pipeline records
/// them without interpretation.
#[derive(Debug)]
pub struct DecodeError {
    msg: String,
}

impl DecodeError {
    /// Create a decode error from a message.
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }

    /// Create a decode error from anything displayable.
    pub fn custom(msg: impl fmt::Display) -> Self {
        Self {
            msg: msg.to_string(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.msg)
    }
}

impl std::error::Error for DecodeError {}

/// One failure recorded while ingesting configuration.
#[derive(Debug)]
pub enum IngestError {
    /// A source could not be read into memory.
    Read(io::Error),
    /// A source (or the merged concatenation) failed to parse.
    Parse(ParseError),
    /// A source parsed, but its root is not a block list.
    RootNotObject,
    /// A block failed to decode.
    Decode(DecodeError),
    /// The list decoder rejected an otherwise-unique object.
    Append(DecodeError),
    /// Two decoded objects share an identifier.
    Duplicate {
        /// The block-type key being reconciled.
        key: String,
        /// The contested identifier.
        id: String,
    },
    /// A top-level field name outside the permitted set.
    InvalidKey {
        /// The offending key.
        key: String,
        /// 1-based source line of the entry.
        line: u32,
    },
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::Read(e) => write!(f, "failed to read source: {}", e),
            IngestError::Parse(e) => write!(f, "{}", e),
            IngestError::RootNotObject => {
                write!(f, "root of the document must be an object")
            }
            IngestError::Decode(e) => write!(f, "failed to decode block: {}", e),
            IngestError::Append(e) => write!(f, "failed to append object: {}", e),
            IngestError::Duplicate { key, id } => {
                write!(f, "{} with id \"{}\" already defined", key, id)
            }
            IngestError::InvalidKey { key, line } => {
                write!(f, "invalid key \"{}\" on line {}", key, line)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Read(e) => Some(e),
            IngestError::Parse(e) => Some(e),
            IngestError::Decode(e) | IngestError::Append(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for IngestError {
    fn from(e: io::Error) -> Self {
        IngestError::Read(e)
    }
}

impl From<ParseError> for IngestError {
    fn from(e: ParseError) -> Self {
        IngestError::Parse(e)
    }
}
