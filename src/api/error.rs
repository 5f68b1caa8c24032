//! Error taxonomy for backend calls.

use serde::Deserialize;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out")]
    NetworkTimeout,

    #[error("Network error or server unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("Unauthenticated: {}", message.as_deref().unwrap_or("session is invalid or expired"))]
    Unauthenticated { message: Option<String> },

    #[error("Internal server error: {}", message.as_deref().unwrap_or("no details"))]
    ServerError { message: Option<String> },

    #[error("Request failed ({status}): {}", message.as_deref().unwrap_or(GENERIC_FAILURE))]
    RequestFailed { status: u16, message: Option<String> },

    #[error("Unexpected response body: {0}")]
    InvalidResponse(String),

    #[error("Credential storage unavailable: {0}")]
    Storage(#[from] StoreError),
}

const GENERIC_FAILURE: &str = "Request failed";

/// Error payload shape the backend uses, `{ "message": "..." }`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Pull a usable message out of a raw response body, if there is one.
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message)
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
    }
}

impl ApiError {
    /// Build the error for a non-2xx status and its raw body.
    pub fn from_status(status: u16, body: &str) -> Self {
        let message = ErrorBody::message_from(body);
        match status {
            401 => ApiError::Unauthenticated { message },
            500 => ApiError::ServerError { message },
            _ => ApiError::RequestFailed { status, message },
        }
    }

    /// Map a transport error from reqwest.
    pub fn from_transport(err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::NetworkTimeout
        } else {
            ApiError::NetworkUnreachable(err.to_string())
        }
    }

    /// Backend-provided message, when the server sent one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Unauthenticated { message }
            | ApiError::ServerError { message }
            | ApiError::RequestFailed { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated { .. })
    }

    /// Short text suitable for showing to the user.
    pub fn user_message(&self) -> String {
        if let Some(message) = self.backend_message() {
            return message.to_string();
        }
        let text = match self {
            ApiError::NetworkTimeout => "The server took too long to respond. Please try again.",
            ApiError::NetworkUnreachable(_) => {
                "Unable to reach the server. Check your connection and try again."
            }
            ApiError::Unauthenticated { .. } => "Session expired. Please log in again.",
            ApiError::ServerError { .. } => "The server ran into a problem. Please try later.",
            ApiError::RequestFailed { .. } => "Request failed. Please try again.",
            ApiError::InvalidResponse(_) => "The server sent an unexpected response.",
            ApiError::Storage(_) => "Unable to access saved session data.",
        };
        text.to_string()
    }
}
