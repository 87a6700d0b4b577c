//! Error types for backend synchronization
//!
//! Errors are classified by recoverability:
//! - Retryable: network issues, timeouts
//! - NonRetryable: rejected requests, parse failures, local state problems
//!
//! Nothing here is fatal to the core: a failed confirmation reverts local
//! state, a bad record is omitted from the view.

use thiserror::Error;

/// Errors from the REST backend or local state bookkeeping.
#[derive(Debug, Error)]
pub enum ApiError {
    // Retryable errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    // Non-retryable errors
    #[error("API rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Failed to parse API response: {0}")]
    Parse(String),

    #[error("Local state error: {0}")]
    State(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl ApiError {
    /// Returns true if retrying the same request could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout(_))
    }

    /// Get a user-friendly recovery suggestion.
    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ApiError::Network(_) => "Check your internet connection and try again.",
            ApiError::Timeout(_) => "The server took too long to respond. Try again.",
            ApiError::Rejected { .. } => "The change was not accepted by the server.",
            ApiError::Parse(_) => "The server sent an unexpected response.",
            ApiError::State(_) => "Reload your tasks and try again.",
            ApiError::Io(_) => "Check file permissions and disk space.",
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Io(err.to_string())
    }
}

/// Serializable error representation for the frontend.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiError {
    pub message: String,
    pub error_type: ErrorType,
    pub can_retry: bool,
    pub recovery_suggestion: String,
}

#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    Retryable,
    NonRetryable,
}

impl From<&ApiError> for UiError {
    fn from(err: &ApiError) -> Self {
        let error_type = if err.is_retryable() {
            ErrorType::Retryable
        } else {
            ErrorType::NonRetryable
        };

        UiError {
            message: err.to_string(),
            error_type,
            can_retry: err.is_retryable(),
            recovery_suggestion: err.recovery_suggestion().to_string(),
        }
    }
}
