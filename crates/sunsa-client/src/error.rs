//! Error types for the Sunsa client

use std::fmt;

use thiserror::Error;

/// Errors that can occur when using the Sunsa client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Server answered with a status other than `200 OK`
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Raw response body
        message: String,
    },

    /// Server answered `200 OK` but the body reports `"status": "Error"`
    #[error("application error ({code}): {message}")]
    Application {
        /// The error marker from the body
        code: String,
        /// The body's `statustext`
        message: String,
    },

    /// HTTP request failed before a response was read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Code half of a domain error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// HTTP status of a non-200 response
    Status(u16),
    /// Marker of an application-level error
    Marker(String),
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "{status}"),
            Self::Marker(marker) => f.write_str(marker),
        }
    }
}

impl ClientError {
    /// Status code or error marker, for the two API-reported failures
    #[must_use]
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Api { status, .. } => Some(ErrorCode::Status(*status)),
            Self::Application { code, .. } => Some(ErrorCode::Marker(code.clone())),
            _ => None,
        }
    }

    /// Message reported by the API, for the two API-reported failures
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } | Self::Application { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
