use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    claim_posting, create_posting, get_image, health, list_active_postings, list_logs,
    live_feed, register_push_token, remove_posting,
};
use crate::ports::{
    repositories::{ItemRepository, UserDirectory},
    services::LifecycleService,
    storage::ImageStore,
};

/// Largest accepted request body, sized for a phone photo plus form fields
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    pub lifecycle_service: Arc<dyn LifecycleService>,
    pub item_repository: Arc<dyn ItemRepository>,
    pub user_directory: Arc<dyn UserDirectory>,
    pub image_store: Arc<dyn ImageStore>,
}

/// Create the main application router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        // Feeds and posting lifecycle
        .route(
            "/items/{kind}",
            get(list_active_postings).post(create_posting),
        )
        .route("/items/{kind}/live", get(live_feed))
        .route("/items/{kind}/{id}", delete(remove_posting))
        .route("/items/{kind}/{id}/claim", post(claim_posting))
        // Uploaded images, for backends without their own public URL
        .route("/images/{*path}", get(get_image))
        // Audit trail
        .route("/logs", get(list_logs))
        // Push registration
        .route("/users/me/push-token", put(register_push_token))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
