//! Error types for configuration, the API gateway and input parsing
//!
//! The pagination and selection controller never fails, so nothing in here
//! describes controller state. Everything below originates either from loading
//! configuration or from talking to the backend API.

use std::time::Duration;

use thiserror::Error;

/// Result type alias using the crate's [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced to host views
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    /// Transport-level HTTP failure (connection refused, TLS, DNS, ...)
    #[error("HTTP error: {0}")]
    Http(Box<reqwest::Error>),

    /// The request did not complete in time
    #[error("Request to {path} timed out after {}s", after.as_secs())]
    Timeout {
        /// Relative API path that was requested
        path: String,
        /// Timeout that was applied
        after: Duration,
    },

    /// The backend answered 401; the session must sign in again
    #[error("Session expired, sign in again at {login_url}")]
    Unauthorized {
        /// Where the user should be sent to authenticate
        login_url: String,
    },

    /// The backend answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Human-readable message extracted from the response
        message: String,
    },

    /// Response body was not the JSON shape we expected
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Row limit outside the values offered by the limit selector
    #[error("Invalid row limit {0}, expected 20 or 50")]
    InvalidLimit(u32),

    /// Unknown dashboard resource name
    #[error("Unknown resource: {0}")]
    InvalidResource(String),

    /// Unknown bulk action name
    #[error("Unknown bulk action: {0}")]
    InvalidBulkAction(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message suitable for a toast or a CLI error line
    ///
    /// API errors show only the backend's message; everything else uses the
    /// `Display` form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            Self::Http(e) if e.is_connect() => {
                "Could not reach the API server. Check your connection.".to_string()
            }
            other => other.to_string(),
        }
    }

    /// Whether this error came from a 401 response
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Whether retrying the same request may succeed
    pub fn is_retriable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Http(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(Box::new(err))
    }
}
