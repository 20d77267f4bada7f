//! Error types for the card deck shuffler client.
//!
//! # Design
//! Three kinds, matching the three ways a call can end badly:
//! - `Configuration`: the client could not be built, so no request was sent.
//! - `Remote`: the service answered with a well-formed error envelope. This
//!   is an ordinary outcome (bad query, bad key, quota) and carries the
//!   envelope's message and code.
//! - `Transport`: the exchange never produced an envelope (connection,
//!   DNS, TLS, timeout, or a body that is not the expected JSON).

use thiserror::Error;

/// Errors returned by `ShufflerClient`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The client configuration is unusable (e.g. an empty API key).
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The service rejected the request with a non-`ok` envelope.
    #[error("remote error {code}: {error}")]
    Remote {
        status: String,
        error: String,
        code: u16,
    },

    /// No envelope was received. `status` is set when an HTTP status line
    /// arrived before the failure.
    #[error("transport failure: {message}")]
    Transport { message: String, status: Option<u16> },
}

impl ApiError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        ApiError::Transport {
            message: message.into(),
            status: None,
        }
    }

    /// Envelope code for remote errors, HTTP status for transport errors
    /// that got that far.
    pub fn code(&self) -> Option<u16> {
        match self {
            ApiError::Configuration(_) => None,
            ApiError::Remote { code, .. } => Some(*code),
            ApiError::Transport { status, .. } => *status,
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, ApiError::Remote { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

impl From<ureq::Error> for ApiError {
    fn from(err: ureq::Error) -> Self {
        let status = match &err {
            ureq::Error::StatusCode(code) => Some(*code),
            _ => None,
        };
        ApiError::Transport {
            message: err.to_string(),
            status,
        }
    }
}
