//! API error taxonomy.

use thiserror::Error;

/// Error type for remote API operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response received (DNS failure, connection refused, timeout, ...)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// 401 or 403 response
    #[error("Authentication error (HTTP {status}): {message}")]
    Auth { status: u16, message: String },

    /// 404 response
    #[error("Not found: {0}")]
    NotFound(String),

    /// 409 response (e.g., duplicate house name)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 5xx response
    #[error("Server error (HTTP {status}): {message}")]
    Server { status: u16, message: String },

    /// Client-side validation failure, raised before any request is sent
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("Unexpected response (HTTP {status}): {message}")]
    Unexpected { status: u16, message: String },

    /// Malformed response body
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    /// Map a non-success HTTP status and body into the taxonomy.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => ApiError::Auth { status, message },
            404 => ApiError::NotFound(message),
            409 => ApiError::Conflict(message),
            500..=599 => ApiError::Server { status, message },
            _ => ApiError::Unexpected { status, message },
        }
    }

    /// True for 401/403 responses.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth { .. })
    }

    /// True specifically for 401 responses.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Auth { status: 401, .. })
    }

    /// True for 404 responses.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }

    /// Whether a house-list fetch hitting this error means "the user has no
    /// houses" rather than a real failure (401/403/404 on `GET /houses`).
    pub fn means_empty_house_list(&self) -> bool {
        self.is_auth() || self.is_not_found()
    }
}

/// Result type alias using ApiError.
pub type ApiResult<T> = Result<T, ApiError>;
