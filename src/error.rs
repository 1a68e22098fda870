//! Error handling for the Zijag Hub client

use std::fmt;
use thiserror::Error;

/// Unified error type for the Zijag Hub client
#[derive(Error, Debug)]
pub enum Error {
    /// No response was received (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the server
        message: String,
    },

    /// A draft failed the client-side required-field check
    #[error("Validation error: {0}")]
    Validation(String),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// The credential could not be decoded
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Missing or expired credential
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Local file errors (uploads)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new validation error
    pub fn validation<T: fmt::Display>(msg: T) -> Self {
        Error::Validation(msg.to_string())
    }

    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new API error
    pub fn api<T: fmt::Display>(status: u16, msg: T) -> Self {
        Error::Api {
            status,
            message: msg.to_string(),
        }
    }

    /// HTTP status of an API error, if this is one
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the caller should send the user back to the login entry point
    pub fn requires_login(&self) -> bool {
        matches!(self, Error::Auth(_) | Error::Api { status: 401, .. })
    }

    /// Short text suitable for a notification
    pub fn user_message(&self) -> String {
        match self {
            Error::Api { message, .. } => message.clone(),
            Error::Validation(msg) | Error::Auth(msg) => msg.clone(),
            Error::Network(_) => "Unable to reach the server".to_string(),
            other => other.to_string(),
        }
    }
}
