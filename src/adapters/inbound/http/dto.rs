use axum::{http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{
    errors::{ImageStoreError, LifecycleError, RepositoryError, ValidationError},
    value_objects::{ItemId, LogId},
};

/// Error half of every handler result
pub type ApiError = (StatusCode, Json<ErrorResponseDto>);

/// DTO for a newly created posting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPostingDto {
    pub id: ItemId,
}

/// DTO for a successful claim
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponseDto {
    pub log_id: LogId,
}

/// Query string for poster-initiated removal
#[derive(Debug, Clone, Deserialize)]
pub struct RemovePostingQuery {
    pub deletion_handle: String,
}

/// DTO for registering a device push token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPushTokenDto {
    pub token: String,
}

/// DTO for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct HealthDto {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// DTO for error responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponseDto {
    pub error: String,
    pub message: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
    pub timestamp: DateTime<Utc>,
}

impl From<LifecycleError> for StatusCode {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Validation(_) => StatusCode::BAD_REQUEST,
            LifecycleError::SelfClaim { .. } => StatusCode::FORBIDDEN,
            LifecycleError::AlreadyResolved { .. } => StatusCode::CONFLICT,
            LifecycleError::Upload { .. } => StatusCode::BAD_GATEWAY,
            LifecycleError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// Error response helpers

impl ErrorResponseDto {
    pub fn from_lifecycle_error(error: LifecycleError) -> Self {
        let mut details = HashMap::new();

        let kind = match &error {
            LifecycleError::Validation(_) => "ValidationError",
            LifecycleError::SelfClaim { item_id, user_id } => {
                details.insert(
                    "item_id".to_string(),
                    serde_json::Value::String(item_id.to_string()),
                );
                details.insert(
                    "user_id".to_string(),
                    serde_json::Value::String(user_id.to_string()),
                );
                "SelfClaimError"
            }
            LifecycleError::AlreadyResolved { item_id } => {
                details.insert(
                    "item_id".to_string(),
                    serde_json::Value::String(item_id.to_string()),
                );
                "AlreadyResolved"
            }
            LifecycleError::Upload { .. } => "UploadError",
            LifecycleError::Persistence { .. } => "PersistenceError",
        };

        if error.is_retryable() {
            details.insert("retryable".to_string(), serde_json::Value::Bool(true));
        }

        ErrorResponseDto {
            error: kind.to_string(),
            message: error.to_string(),
            details: if details.is_empty() {
                None
            } else {
                Some(details)
            },
            timestamp: Utc::now(),
        }
    }

    pub fn bad_request(message: &str) -> Self {
        ErrorResponseDto {
            error: "BadRequest".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn unauthorized(message: &str) -> Self {
        ErrorResponseDto {
            error: "Unauthorized".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn forbidden(message: &str) -> Self {
        ErrorResponseDto {
            error: "Forbidden".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn not_found(message: &str) -> Self {
        ErrorResponseDto {
            error: "NotFound".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    pub fn internal_error(message: &str) -> Self {
        ErrorResponseDto {
            error: "InternalServerError".to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }
}

/// Map an engine error to its status and body
pub fn lifecycle_error(err: LifecycleError) -> ApiError {
    let status = StatusCode::from(err.clone());
    (status, Json(ErrorResponseDto::from_lifecycle_error(err)))
}

pub fn validation_error(err: ValidationError) -> ApiError {
    lifecycle_error(LifecycleError::Validation(err))
}

pub fn repository_error(err: RepositoryError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponseDto::internal_error(&err.to_string())),
    )
}

pub fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponseDto::bad_request(message)),
    )
}

pub fn forbidden(message: &str) -> ApiError {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorResponseDto::forbidden(message)),
    )
}

pub fn not_found(message: &str) -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponseDto::not_found(message)))
}

pub fn image_store_error(err: ImageStoreError) -> ApiError {
    match err {
        ImageStoreError::Rejected { .. } => bad_request(&err.to_string()),
        ImageStoreError::InfrastructureError { .. } => (
            StatusCode::BAD_GATEWAY,
            Json(ErrorResponseDto::internal_error(&err.to_string())),
        ),
    }
}
