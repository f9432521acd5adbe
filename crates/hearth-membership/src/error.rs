//! Membership error types.

use thiserror::Error;

/// Error type for membership operations.
#[derive(Error, Debug)]
pub enum MembershipError {
    /// The backend rejected or failed the call.
    #[error(transparent)]
    Api(#[from] hearth_api::ApiError),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(#[from] hearth_storage::StorageError),
}

/// Result type alias using MembershipError.
pub type MembershipResult<T> = Result<T, MembershipError>;
