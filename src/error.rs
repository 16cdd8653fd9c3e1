//! Error handling for the SpendTrack client

use std::fmt;
use thiserror::Error;

/// Unified error type for the SpendTrack client
///
/// Every failure of the access layer is folded into this one type, whatever
/// the underlying cause (network, HTTP status, body decoding).
#[derive(Error, Debug)]
pub enum Error {
    /// The request never reached the server or no response was received
    #[error("Network request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Server-provided message, or `HTTP error! status: <code>`
        message: String,
    },

    /// The response body was not the JSON that was expected
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server wrapped a failure in a `{ success: false }` envelope
    #[error("{0}")]
    Api(String),

    /// Caller-supplied input was rejected before any request was made
    #[error("{0}")]
    Validation(String),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A CSV export could not be written
    #[error("Export error: {0}")]
    Export(#[from] csv::Error),

    /// The persisted session could not be read or written
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),
}

impl Error {
    /// Create an HTTP status error
    pub fn http<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Http {
            status,
            message: msg.to_string(),
        }
    }

    /// Create an envelope error
    pub fn api<T: fmt::Display>(msg: T) -> Self {
        Error::Api(msg.to_string())
    }

    /// Create a client-side validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// The user-facing message of this error
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// The HTTP status, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => Some(*status),
            Error::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether this error was detected locally, without a round trip
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
