//! Error types for the event submission client.
//!
//! # Design
//! Every submission failure is terminal for that attempt. The submitter logs
//! the error and hands it back to the caller, who is free to ignore it.
//! `NonSuccessStatus` keeps the raw status and body so a rejected request is
//! distinguishable from one that never reached the server.

use thiserror::Error;

/// Errors produced while building, sending, or classifying a submission.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The configured endpoint is not an absolute http(s) URL.
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// The payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced an HTTP response.
    #[error("transport failed: {0}")]
    TransportError(String),

    /// The server answered with anything other than 200.
    #[error("HTTP {status}: {body}")]
    NonSuccessStatus { status: u16, body: String },
}

impl SubmitError {
    /// Short stable label used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::InvalidEndpoint(_) => "invalid_endpoint",
            SubmitError::SerializationError(_) => "serialization",
            SubmitError::TransportError(_) => "transport",
            SubmitError::NonSuccessStatus { .. } => "non_success_status",
        }
    }
}

/// Errors produced while reading `ClientConfig` from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}
