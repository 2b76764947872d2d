//! Error types for the DNS-01 solver
//!
//! This module defines all error types used throughout the workspace.
//!
//! A 404 on a record-set read is *not* represented here: it is the
//! [`RemoteRecordSet::Absent`](crate::record::RemoteRecordSet::Absent) state.

use thiserror::Error;

/// Result type alias for solver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the DNS-01 solver
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing solver configuration or credentials
    #[error("Configuration error: {0}")]
    Config(String),

    /// Secret store errors (I/O, malformed store contents)
    #[error("Secret store error: {0}")]
    SecretStore(String),

    /// Reading the current record set failed
    ///
    /// Raised for any read status other than 200/404, and for a 200 whose
    /// body does not parse as a record set.
    #[error("Record set fetch failed ({status}) url: {url} body: {body}")]
    Fetch {
        /// HTTP status returned by the provider
        status: u16,
        /// Requested URL
        url: String,
        /// Raw response body, or the parse failure description
        body: String,
    },

    /// The provider answered with a status outside the accepted range
    #[error("Provider API call failed ({status}) url: {url} method: {method} body: {body}")]
    Transport {
        /// HTTP status returned by the provider
        status: u16,
        /// HTTP method of the failed request
        method: String,
        /// Requested URL
        url: String,
        /// Raw response body
        body: String,
    },

    /// Connection-level failures (DNS, TLS, reset, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a secret store error
    pub fn secret_store(msg: impl Into<String>) -> Self {
        Self::SecretStore(msg.into())
    }

    /// Create a record-set fetch error
    pub fn fetch(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Fetch {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create a transport error
    pub fn transport(
        status: u16,
        method: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::Transport {
            status,
            method: method.into(),
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } | Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the host is likely to succeed by calling again later
    ///
    /// Rate limiting, provider-side 5xx and connection failures are
    /// transient. Nothing in this workspace retries on its own; the
    /// classification only feeds log output.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            _ => matches!(self.status(), Some(429) | Some(500..=599)),
        }
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
