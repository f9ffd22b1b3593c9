use thiserror::Error;

use super::RepositoryError;

/// Errors raised while resolving recipients or delivering a push message
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Failed to resolve recipients: {0}")]
    Directory(#[from] RepositoryError),

    #[error("Push transport error: {message}")]
    Transport { message: String },

    #[error("Push provider rejected message for '{address}': {reason}")]
    Rejected { address: String, reason: String },
}

/// Result type for notification operations
pub type NotificationResult<T> = Result<T, NotificationError>;
