//! Error types for the catalog client.
//!
//! # Design
//! Every failure a view can see collapses into one `ApiError`, and stores
//! surface it as its `Display` string. `Http` keeps the raw status and body
//! for logging; `NotFound` is the local condition raised when an id is absent
//! from already-fetched state, not a network result.

use thiserror::Error;

/// Errors returned by the client, the stores and the search aggregator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (connection, DNS, body read).
    #[error("network error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP error! status: {status}")]
    Http { status: u16, body: String },

    /// The response body could not be decoded into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The id is not present in the locally fetched list.
    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: String },
}

impl ApiError {
    /// Status code of an `Http` error, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for a local miss or a server 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. }) || self.status() == Some(404)
    }
}

/// Configuration errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}
