// Client-side error types
use thiserror::Error;

use crate::session::SessionError;

/// Failure of a single page action. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Required input missing, caught before any request is issued
    #[error("{0}")]
    Validation(String),

    /// Non-2xx response; `message` is the server's or the call-site fallback
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// 2xx response that does not honour the expected envelope
    #[error("{0}")]
    Contract(String),

    /// The owning page was unmounted while the call was in flight
    #[error("Request cancelled")]
    Cancelled,

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn api(status: u16, message: impl Into<String>) -> Self {
        ClientError::Api {
            status,
            message: message.into(),
        }
    }

    pub fn contract(message: impl Into<String>) -> Self {
        ClientError::Contract(message.into())
    }

    /// HTTP status of the failed response, when there was one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Stable code for machine-readable output
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::Validation(_) => "VALIDATION_ERROR",
            ClientError::Api { status: 401, .. } => "UNAUTHORIZED",
            ClientError::Api { status: 403, .. } => "FORBIDDEN",
            ClientError::Api { status: 404, .. } => "NOT_FOUND",
            ClientError::Api { status: 409, .. } => "CONFLICT",
            ClientError::Api { .. } => "API_ERROR",
            ClientError::Transport(_) => "TRANSPORT_ERROR",
            ClientError::Contract(_) => "CONTRACT_VIOLATION",
            ClientError::Cancelled => "CANCELLED",
            ClientError::Session(_) => "SESSION_ERROR",
            ClientError::InvalidUrl(_) => "INVALID_URL",
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}
