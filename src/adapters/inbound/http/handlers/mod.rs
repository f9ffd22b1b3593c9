pub mod feed_handlers;
pub mod image_handlers;
pub mod posting_handlers;
pub mod user_handlers;

pub use feed_handlers::*;
pub use image_handlers::*;
pub use posting_handlers::*;
pub use user_handlers::*;

use crate::{
    adapters::inbound::http::dto::{bad_request, validation_error, ApiError},
    domain::{models::PostingKind, value_objects::ItemId},
};

/// Parse the `{kind}` path segment
pub(crate) fn parse_kind(kind: &str) -> Result<PostingKind, ApiError> {
    kind.parse().map_err(validation_error)
}

/// Parse the `{id}` path segment
pub(crate) fn parse_item_id(id: String) -> Result<ItemId, ApiError> {
    ItemId::new(id).map_err(|e| bad_request(&format!("Invalid item id: {}", e)))
}
