use crate::domain::errors::ImageStoreError;
use std::io;
use thiserror::Error as ThisError;

/// Failures while setting up an image store backend
#[derive(ThisError, Debug)]
pub enum StoreError {
    #[error("Object store error: {0}")]
    ObjectStore(#[from] object_store::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid storage configuration: {0}")]
    InvalidConfig(String),
}

impl StoreError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        StoreError::InvalidConfig(message.into())
    }
}

/// Convert object_store errors to domain image store errors
impl From<object_store::Error> for ImageStoreError {
    fn from(err: object_store::Error) -> Self {
        match err {
            object_store::Error::PermissionDenied { .. }
            | object_store::Error::Unauthenticated { .. } => ImageStoreError::Rejected {
                message: err.to_string(),
            },
            object_store::Error::AlreadyExists { path, .. } => ImageStoreError::Rejected {
                message: format!("An image already exists at {}", path),
            },
            _ => ImageStoreError::InfrastructureError {
                message: format!("Object store operation failed: {}", err),
                source: Some(err.to_string()),
            },
        }
    }
}
