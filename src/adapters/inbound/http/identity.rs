use axum::{extract::FromRequestParts, http::request::Parts, http::StatusCode, Json};

use super::dto::{ApiError, ErrorResponseDto};
use crate::domain::{models::UserIdentity, value_objects::UserId};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_EMAIL_HEADER: &str = "x-user-email";
pub const USER_PHONE_HEADER: &str = "x-user-phone";

/// Identity of the caller, taken from headers set by the authenticating proxy
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserIdentity);

fn header<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn unauthorized(message: &str) -> ApiError {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponseDto::unauthorized(message)),
    )
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header(parts, USER_ID_HEADER)
            .ok_or_else(|| unauthorized("Missing x-user-id header"))?;
        let email = header(parts, USER_EMAIL_HEADER)
            .ok_or_else(|| unauthorized("Missing x-user-email header"))?;
        let phone = header(parts, USER_PHONE_HEADER).map(str::to_string);

        let user_id = UserId::new(user_id).map_err(|e| unauthorized(&e.to_string()))?;
        let identity =
            UserIdentity::new(user_id, email, phone).map_err(|e| unauthorized(&e.to_string()))?;

        Ok(CurrentUser(identity))
    }
}
