//! Authentication error types.

use thiserror::Error;

/// Authentication error type.
#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend rejected or failed the call; carries the full taxonomy
    /// so callers can show the right user-facing message.
    #[error(transparent)]
    Api(#[from] hearth_api::ApiError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] hearth_storage::StorageError),

    /// Invalid state transition in the auth FSM
    #[error("Invalid auth state transition: {0}")]
    InvalidStateTransition(String),
}

/// Result type alias using AuthError.
pub type AuthResult<T> = Result<T, AuthError>;
