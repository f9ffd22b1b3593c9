use thiserror::Error;

use super::{ImageStoreError, RepositoryError, ValidationError};
use crate::domain::value_objects::{ItemId, UserId};

/// Errors surfaced by the lifecycle engine's `create`, `claim` and `remove` operations.
///
/// Notification failures never appear here; they are logged and dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LifecycleError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("User '{user_id}' cannot claim their own posting '{item_id}'")]
    SelfClaim { item_id: ItemId, user_id: UserId },

    #[error("Posting '{item_id}' is no longer active")]
    AlreadyResolved { item_id: ItemId },

    #[error("Image upload failed: {message}")]
    Upload { message: String },

    #[error("Persistence failed: {message}")]
    Persistence { message: String },
}

impl LifecycleError {
    /// Whether the caller may blindly retry the failed operation
    pub fn is_retryable(&self) -> bool {
        matches!(self, LifecycleError::Persistence { .. })
    }
}

impl From<RepositoryError> for LifecycleError {
    fn from(err: RepositoryError) -> Self {
        LifecycleError::Persistence {
            message: err.to_string(),
        }
    }
}

impl From<ImageStoreError> for LifecycleError {
    fn from(err: ImageStoreError) -> Self {
        LifecycleError::Upload {
            message: err.to_string(),
        }
    }
}

/// Result type for lifecycle operations
pub type LifecycleResult<T> = Result<T, LifecycleError>;
