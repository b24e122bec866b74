//! Client error types.

use dealbase_proto::error_codes;
use thiserror::Error;

/// Client errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Connection failed.
    #[error("connection error: {0}")]
    Connection(String),

    /// Protocol error.
    #[error("protocol error: {0}")]
    Protocol(#[from] dealbase_proto::Error),

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// The server rejected the request.
    #[error("server error {code}: {message}")]
    Server {
        /// Wire error code (see [`dealbase_proto::error_codes`]).
        code: u32,
        /// Human-readable message.
        message: String,
    },
}

impl Error {
    /// Whether this is a validation rejection.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Server { code, .. } if *code == error_codes::VALIDATION)
    }

    /// Whether the referenced id did not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Server { code, .. } if *code == error_codes::NOT_FOUND)
    }

    /// Whether a delete was blocked by dependent rows.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Server { code, .. } if *code == error_codes::CONFLICT)
    }
}
