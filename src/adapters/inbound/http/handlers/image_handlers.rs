use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::adapters::inbound::http::{
    dto::{image_store_error, not_found, ApiError},
    router::AppState,
};

/// Serve an uploaded posting image by its object path
pub async fn get_image(
    State(app_state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, ApiError> {
    let image = app_state
        .image_store
        .fetch(&path)
        .await
        .map_err(image_store_error)?
        .ok_or_else(|| not_found(&format!("No image at '{}'", path)))?;

    let content_type = image
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(([(header::CONTENT_TYPE, content_type)], image.data).into_response())
}
