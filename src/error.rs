//! Unified error types for amf3-rs

use std::fmt;
use std::io;

use bytes::Bytes;

use crate::amf::reference::ReferenceKind;
use crate::amf::AmfValue;

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all codec operations
#[derive(Debug)]
pub enum Error {
    /// I/O error while reading a request or writing a reply
    Io(io::Error),
    /// AMF encoding/decoding error without further context
    Amf(AmfError),
    /// Encoding failed; carries the value that was being encoded
    Encode {
        source: AmfError,
        value: Box<AmfValue>,
    },
    /// Decoding failed; carries the raw input and the offset of the failure
    Decode {
        source: AmfError,
        position: usize,
        input: Bytes,
    },
    /// Invalid configuration
    Config(String),
    /// Request handler refused or failed the request
    Handler(String),
}

impl Error {
    /// The underlying codec error, if this is a codec failure
    pub fn amf(&self) -> Option<&AmfError> {
        match self {
            Error::Amf(e) => Some(e),
            Error::Encode { source, .. } | Error::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Amf(e) => write!(f, "AMF error: {}", e),
            Error::Encode { source, value } => {
                write!(f, "AMF encode error: {} (value: {:?})", source, value)
            }
            Error::Decode {
                source,
                position,
                input,
            } => write!(
                f,
                "AMF decode error at byte {} of {}: {}",
                position,
                input.len(),
                source
            ),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
            Error::Handler(msg) => write!(f, "Handler error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Amf(e) => Some(e),
            Error::Encode { source, .. } | Error::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<AmfError> for Error {
    fn from(err: AmfError) -> Self {
        Error::Amf(err)
    }
}

/// AMF encoding/decoding errors
///
/// Every variant is terminal for the encode or decode call that raised it.
#[derive(Debug, Clone, PartialEq)]
pub enum AmfError {
    /// Value (or wire marker) has no supported AMF3 representation
    UnsupportedType(String),
    /// Integer does not fit the U29 range
    IntegerOutOfRange(i64),
    /// Marker byte is not an AMF3 type marker
    UnknownType(u8),
    /// Back-reference index past the end of its table
    InvalidReference { kind: ReferenceKind, index: usize },
    /// Input ended before the payload was complete
    BufferUnderrun,
    /// No factory registered for a wire class name
    ClassNotFound(String),
    /// A decoded field could not be assigned to the target object
    PropertyAssignment { class_name: String, field: String },
    /// Value graph nests deeper than the configured limit
    DepthExceeded(usize),
    /// String payload is not valid UTF-8
    InvalidUtf8,
    /// Payload required by the marker is missing or malformed
    InvalidPayload(String),
}

impl fmt::Display for AmfError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmfError::UnsupportedType(t) => write!(f, "Unsupported AMF3 type: {}", t),
            AmfError::IntegerOutOfRange(v) => write!(f, "Integer out of range: {}", v),
            AmfError::UnknownType(m) => write!(f, "Unknown AMF3 marker: 0x{:02x}", m),
            AmfError::InvalidReference { kind, index } => {
                write!(f, "Invalid AMF3 {} reference: {}", kind, index)
            }
            AmfError::BufferUnderrun => write!(f, "Unexpected end of AMF data"),
            AmfError::ClassNotFound(name) => write!(f, "Class not found: {}", name),
            AmfError::PropertyAssignment { class_name, field } => {
                write!(f, "Cannot assign property {} on {}", field, class_name)
            }
            AmfError::DepthExceeded(max) => write!(f, "AMF nesting too deep (max {})", max),
            AmfError::InvalidUtf8 => write!(f, "Invalid UTF-8 in AMF string"),
            AmfError::InvalidPayload(msg) => write!(f, "Invalid AMF payload: {}", msg),
        }
    }
}

impl std::error::Error for AmfError {}
