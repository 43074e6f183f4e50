//! Error types for the blog API client.
//!
//! # Design
//! Every failed read or write surfaces as a single `TransportError` type. The
//! variants keep the raw detail (status code, body, decoder message) for
//! logging, but callers are expected to treat them uniformly: a view renders
//! one static failure message regardless of which variant it got.
//!
//! The type is `Clone` because a result may be shared between every reader
//! coalesced onto the same in-flight request.

use thiserror::Error;

/// Errors returned by `BlogClient` parse methods and by `Transport`
/// implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The server answered with a non-2xx status (including 404).
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a response.
    #[error("network failure: {0}")]
    Network(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Decode(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Encode(String),
}

impl TransportError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TransportError::Status { status: 404, .. })
    }
}
