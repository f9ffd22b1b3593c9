use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;

use crate::adapters::inbound::http::{
    dto::{repository_error, ApiError, HealthDto, RegisterPushTokenDto},
    identity::CurrentUser,
    router::AppState,
};

/// Register the caller's device push token. An empty token unregisters.
pub async fn register_push_token(
    State(app_state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(dto): Json<RegisterPushTokenDto>,
) -> Result<StatusCode, ApiError> {
    app_state
        .user_directory
        .register_push_token(&user.user_id, &dto.token)
        .await
        .map_err(repository_error)?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok",
        timestamp: Utc::now(),
    })
}
