//! Error types for redis-objects
//!
//! Provides a unified error type for all operations, grouped into three
//! families (see [`ErrorKind`]): failures reported by the transport, value
//! marshalling failures, and invalid call shapes.

use thiserror::Error;

/// Result type alias using ObjectError
pub type Result<T> = std::result::Result<T, ObjectError>;

/// Coarse classification of an [`ObjectError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The store or the connection to it failed
    Transport,

    /// A value could not be encoded to or decoded from its wire form
    Marshal,

    /// The call itself was malformed
    Usage,
}

/// Unified error type for redis-objects operations
#[derive(Debug, Error)]
pub enum ObjectError {
    // -------------------------------------------------------------------------
    // Transport Errors
    // -------------------------------------------------------------------------
    /// Error reply from the store (e.g. `WRONGTYPE`, `ERR no such key`)
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Timed out after {0} ms")]
    Timeout(u64),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    // -------------------------------------------------------------------------
    // Marshal Errors
    // -------------------------------------------------------------------------
    #[error("Marshal error: {0}")]
    Marshal(String),

    // -------------------------------------------------------------------------
    // Usage Errors
    // -------------------------------------------------------------------------
    #[error("Usage error: {0}")]
    Usage(String),

    #[error("No transport configured; pass one explicitly or call transport::set_default")]
    NoTransport,
}

impl ObjectError {
    /// Which family this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            ObjectError::Transport(_)
            | ObjectError::Io(_)
            | ObjectError::Protocol(_)
            | ObjectError::Timeout(_)
            | ObjectError::ConnectionClosed => ErrorKind::Transport,
            ObjectError::Marshal(_) => ErrorKind::Marshal,
            ObjectError::Usage(_) | ObjectError::NoTransport => ErrorKind::Usage,
        }
    }

    pub(crate) fn marshal(message: impl std::fmt::Display) -> Self {
        ObjectError::Marshal(message.to_string())
    }

    pub(crate) fn usage(message: impl std::fmt::Display) -> Self {
        ObjectError::Usage(message.to_string())
    }
}
