use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use chrono::NaiveDate;

use super::{parse_item_id, parse_kind};
use crate::{
    adapters::inbound::http::{
        dto::{
            bad_request, forbidden, lifecycle_error, repository_error, validation_error,
            ApiError, ClaimResponseDto, CreatedPostingDto, RemovePostingQuery,
        },
        identity::CurrentUser,
        router::AppState,
    },
    domain::{
        errors::ValidationError,
        models::{LocalImage, Posting, PostingDraft},
        value_objects::DeletionHandle,
    },
};

/// Multipart fields of the posting form, as received
#[derive(Default)]
struct PostingForm {
    item_name: String,
    description: String,
    location: String,
    occurred_date: String,
    occurred_time: String,
    image: Option<LocalImage>,
}

impl PostingForm {
    fn into_draft(self) -> Result<PostingDraft, ValidationError> {
        let occurred_date = match self.occurred_date.trim() {
            "" => None,
            raw => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                ValidationError::InvalidField {
                    field: "occurred_date".to_string(),
                    value: raw.to_string(),
                    expected: "a date formatted as YYYY-MM-DD".to_string(),
                }
            })?),
        };

        // A missing file part becomes an empty image, which the engine rejects
        let image = self
            .image
            .unwrap_or_else(|| LocalImage::new("", None, Bytes::new()));

        Ok(PostingDraft::builder()
            .item_name(self.item_name)
            .description(self.description)
            .location(self.location)
            .image(image)
            .maybe_occurred_date(occurred_date)
            .occurred_time_label(self.occurred_time)
            .build())
    }
}

/// Handle posting creation from a multipart form
pub async fn create_posting(
    State(app_state): State<AppState>,
    Path(kind): Path<String>,
    CurrentUser(poster): CurrentUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedPostingDto>), ApiError> {
    let kind = parse_kind(&kind)?;
    let mut form = PostingForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| bad_request(&format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "image" {
            let file_name = field.file_name().unwrap_or("image").to_string();
            let content_type = field.content_type().map(str::to_string);
            let data = field
                .bytes()
                .await
                .map_err(|e| bad_request(&format!("Failed to read image: {}", e)))?;
            form.image = Some(LocalImage::new(file_name, content_type, data));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| bad_request(&format!("Failed to read field '{}': {}", name, e)))?;

        match name.as_str() {
            "item_name" => form.item_name = value,
            "description" => form.description = value,
            "location" => form.location = value,
            "occurred_date" => form.occurred_date = value,
            "occurred_time" => form.occurred_time = value,
            _ => {}
        }
    }

    let draft = form.into_draft().map_err(validation_error)?;

    let id = app_state
        .lifecycle_service
        .create(kind, draft, poster)
        .await
        .map_err(lifecycle_error)?;

    Ok((StatusCode::CREATED, Json(CreatedPostingDto { id })))
}

/// Handle a claim against a posting, using the caller's snapshot of it
pub async fn claim_posting(
    State(app_state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    CurrentUser(claimer): CurrentUser,
    Json(snapshot): Json<Posting>,
) -> Result<(StatusCode, Json<ClaimResponseDto>), ApiError> {
    let kind = parse_kind(&kind)?;
    let item_id = parse_item_id(id)?;

    if snapshot.kind() != kind {
        return Err(bad_request(&format!(
            "Snapshot is a {} posting but the {} feed was addressed",
            snapshot.kind(),
            kind
        )));
    }

    let log_id = app_state
        .lifecycle_service
        .claim(&item_id, claimer, snapshot)
        .await
        .map_err(lifecycle_error)?;

    Ok((StatusCode::CREATED, Json(ClaimResponseDto { log_id })))
}

/// Handle poster-initiated removal.
///
/// Only the original poster may remove a posting, and only with the handle
/// of its own image. Removing a posting that is already gone succeeds.
pub async fn remove_posting(
    State(app_state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    CurrentUser(caller): CurrentUser,
    Query(query): Query<RemovePostingQuery>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    let item_id = parse_item_id(id)?;
    let handle = DeletionHandle::new(query.deletion_handle).map_err(validation_error)?;

    let Some(posting) = app_state
        .item_repository
        .find_posting(kind, &item_id)
        .await
        .map_err(repository_error)?
    else {
        return Ok(StatusCode::NO_CONTENT);
    };

    if posting.poster().user_id != caller.user_id {
        return Err(forbidden(&format!(
            "Posting {} belongs to another user",
            item_id
        )));
    }

    if posting.image().deletion_handle != handle {
        return Err(bad_request(
            "Deletion handle does not match the posting's image",
        ));
    }

    app_state
        .lifecycle_service
        .remove(kind, &item_id, &handle)
        .await
        .map_err(lifecycle_error)?;

    Ok(StatusCode::NO_CONTENT)
}
