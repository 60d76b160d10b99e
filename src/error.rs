//! Error types for Canopy store operations.
//!
//! The [`Result`] type alias provides a convenient shorthand for operations
//! that may fail. Conflict exhaustion in a transaction is NOT an error: the
//! final conflict response is returned as an `Ok` value so callers branch on
//! [`CanopyResponse::is_success`](crate::types::CanopyResponse::is_success)
//! instead of catching errors. Everything non-recoverable surfaces here.

use std::io;
use thiserror::Error;

/// Result type for Canopy store operations.
pub type Result<T> = std::result::Result<T, CanopyError>;

/// Errors that can occur when talking to a Canopy store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CanopyError {
    /// HTTP request could not be completed (connection refused, TLS, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// Network I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Response body is not valid JSON.
    ///
    /// The store speaks JSON for every value, including the bare literals
    /// `null`, `true` and `false`; anything else in a body is malformed.
    #[error("Body parse error: {0}")]
    BodyParse(String),

    /// Failed to serialize an outgoing value.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The store answered with a status the caller cannot recover from.
    ///
    /// Carries the response untouched so the caller can still inspect the
    /// status, headers and body. Precondition conflicts (412) never take
    /// this path; they are handled inside the transaction loop.
    #[error("store returned status {}", .0.status)]
    Status(crate::types::CanopyResponse),

    /// Token exchange failed or the issuer answered with garbage.
    #[error("Credential error: {0}")]
    Credential(String),

    /// The store violated its wire contract.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Invalid parameters were provided when creating or using a client.
    ///
    /// Fails fast and is never retried.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CanopyError {
    /// Status code of the response embedded in a [`CanopyError::Status`].
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            CanopyError::Status(response) => Some(response.status),
            _ => None,
        }
    }

    /// True for HTTP 401 (Unauthorized) or 403 (Forbidden).
    #[inline]
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}
