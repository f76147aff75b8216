//! Error types for the mathjs API client.
//!
//! # Design
//! Every non-2xx response lands in `HttpError` with the raw status code and
//! body, which is what the conformance suite asserts on. The remaining
//! variants cover client-side failures: JSON codec errors, connection
//! errors from the transport, and an empty base URL.

use thiserror::Error;

/// Errors returned by `MathjsClient` parse methods and `MathjsSession` calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a status outside 200..=299.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The server accepted a POST but reported an evaluation error instead
    /// of a result list.
    #[error("evaluation failed: {0}")]
    Evaluation(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (DNS, connect, I/O).
    #[error("transport failed: {0}")]
    Transport(String),

    /// The resolved base URL was empty.
    #[error("invalid base URL: {0:?}")]
    InvalidBaseUrl(String),
}

impl ApiError {
    /// HTTP status code carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
