use crate::domain::value_objects::ItemId;

/// Errors raised by the item repository and the user directory
#[derive(Debug, Clone)]
pub enum RepositoryError {
    /// A record with the same identifier already exists
    Conflict { id: ItemId },

    /// A stored record could not be decoded into a domain value
    CorruptRecord { collection: String, message: String },

    /// Infrastructure error with external source
    Backend { message: String },
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepositoryError::Conflict { id } => write!(f, "Record already exists: {}", id),
            RepositoryError::CorruptRecord {
                collection,
                message,
            } => {
                write!(f, "Corrupt record in '{}': {}", collection, message)
            }
            RepositoryError::Backend { message } => write!(f, "Repository backend error: {}", message),
        }
    }
}

impl std::error::Error for RepositoryError {}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Errors raised by the image store
#[derive(Debug, Clone)]
pub enum ImageStoreError {
    /// The store refused the upload
    Rejected { message: String },

    /// Infrastructure error with external source
    InfrastructureError {
        message: String,
        source: Option<String>,
    },
}

impl std::fmt::Display for ImageStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageStoreError::Rejected { message } => write!(f, "Image rejected: {}", message),
            ImageStoreError::InfrastructureError { message, .. } => {
                write!(f, "Image store error: {}", message)
            }
        }
    }
}

impl std::error::Error for ImageStoreError {}

/// Result type for image store operations
pub type ImageStoreResult<T> = Result<T, ImageStoreError>;
