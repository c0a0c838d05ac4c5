//! Unified error types for Maxun
//!
//! Every failure surfaced by the SDK is a [`MaxunError`]. Callers branch on
//! the variant (or on [`MaxunError::name`]) rather than on message text:
//!
//! - `Validation` - rejected on the client before any request was sent
//! - `Transport` - the request never got a response (network, timeout)
//! - `Api` - the server answered with an error status
//! - `NotFound` / `OperationFailed` - the server answered 2xx but without `data`

use thiserror::Error;

/// Fallback message when an error body carries neither `error` nor `message`
pub const DEFAULT_API_ERROR_MESSAGE: &str = "API request failed";

/// Unified error type for all Maxun operations
#[derive(Error, Debug)]
pub enum MaxunError {
    // Client-side errors
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    // Transport errors
    #[error("No response from server: {message}")]
    Transport { message: String, timed_out: bool },

    // Backend errors
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        details: Option<serde_json::Value>,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    OperationFailed(String),

    // Robot lifecycle errors
    #[error("Robot {0} has been deleted")]
    RobotDeleted(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MaxunError {
    /// Build an `Api` error from a status code and the raw response body.
    ///
    /// The message is taken from the body's `error` field, then `message`,
    /// then [`DEFAULT_API_ERROR_MESSAGE`].
    pub fn from_response(status: u16, body: Option<serde_json::Value>) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| {
                b.get("error")
                    .and_then(|v| v.as_str())
                    .or_else(|| b.get("message").and_then(|v| v.as_str()))
            })
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_API_ERROR_MESSAGE)
            .to_string();

        Self::Api {
            message,
            status,
            details: body,
        }
    }

    /// Stable tag for the error kind
    pub fn name(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::Config(_) => "ConfigError",
            Self::Transport { .. } => "TransportError",
            Self::Api { .. } => "ApiError",
            Self::NotFound(_) => "NotFoundError",
            Self::OperationFailed(_) => "OperationFailedError",
            Self::RobotDeleted(_) => "RobotDeletedError",
            Self::Io(_) => "IoError",
            Self::Serialization(_) => "SerializationError",
        }
    }

    /// HTTP status associated with the error, if the server was reached
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound(_) => Some(404),
            _ => None,
        }
    }

    /// Raw response body of a rejected request
    pub fn details(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Api { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    /// True when the request timed out before the server answered
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport { timed_out: true, .. })
    }
}

/// Result type alias using MaxunError
pub type Result<T> = std::result::Result<T, MaxunError>;
