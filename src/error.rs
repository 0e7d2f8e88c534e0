//! Unified error types for amf-gateway

use std::fmt;
use std::io;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Result type alias using the library's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all gateway operations
#[derive(Debug)]
pub enum Error {
    /// I/O error during network or log file operations
    Io(io::Error),
    /// Packet framing failure; byte offsets can no longer be trusted
    Packet(PacketError),
    /// Request was not answered within the configured timeout
    Timeout,
    /// Concurrent request limit reached
    Overloaded,
    /// Invalid configuration
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Packet(e) => write!(f, "Packet error: {}", e),
            Error::Timeout => write!(f, "Operation timed out"),
            Error::Overloaded => write!(f, "Too many concurrent requests"),
            Error::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Packet(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<PacketError> for Error {
    fn from(err: PacketError) -> Self {
        Error::Packet(err)
    }
}

/// Packet framing errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PacketError {
    /// A field declares more bytes than the buffer holds
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },
}

impl fmt::Display for PacketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketError::Truncated {
                offset,
                needed,
                available,
            } => write!(
                f,
                "Truncated packet at offset {}: needed {} bytes, {} available",
                offset, needed, available
            ),
        }
    }
}

impl std::error::Error for PacketError {}

/// Argument list inspection errors
///
/// These never abort packet processing. They degrade to the descriptive
/// label returned by [`InspectError::label`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InspectError {
    /// Payload does not start with a strict-array argument list
    MalformedArgumentList,
    /// First argument carries a tag outside the AMF0 marker table
    UnknownTypeTag(u8),
}

impl InspectError {
    /// Label used in diagnostic records
    pub fn label(&self) -> &'static str {
        match self {
            InspectError::MalformedArgumentList => "couldn't find args",
            InspectError::UnknownTypeTag(_) => "unknown type",
        }
    }
}

impl fmt::Display for InspectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InspectError::MalformedArgumentList => write!(f, "Malformed argument list"),
            InspectError::UnknownTypeTag(t) => write!(f, "Unknown AMF0 type tag: 0x{:02x}", t),
        }
    }
}

impl std::error::Error for InspectError {}

impl Error {
    /// HTTP status used when this error ends a remoting request
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Packet(_) => StatusCode::BAD_REQUEST,
            Error::Timeout => StatusCode::REQUEST_TIMEOUT,
            Error::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            Error::Io(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
