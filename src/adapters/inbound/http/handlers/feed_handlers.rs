use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, KeepAliveStream, Sse},
    Json,
};
use futures::{stream::BoxStream, StreamExt};

use super::parse_kind;
use crate::{
    adapters::inbound::http::{
        dto::{repository_error, ApiError},
        router::AppState,
    },
    domain::models::{LostAndFoundLog, Posting},
};

/// Server-sent event stream of feed snapshots
pub type FeedEvents = BoxStream<'static, Result<Event, axum::Error>>;

/// Current active feed for a kind, newest first
pub async fn list_active_postings(
    State(app_state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<Vec<Posting>>, ApiError> {
    let kind = parse_kind(&kind)?;

    let postings = app_state
        .item_repository
        .active_postings(kind)
        .await
        .map_err(repository_error)?;

    Ok(Json(postings))
}

/// Live feed: one `snapshot` event with the full active set per change
pub async fn live_feed(
    State(app_state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Sse<KeepAliveStream<FeedEvents>>, ApiError> {
    let kind = parse_kind(&kind)?;

    let feed = app_state
        .item_repository
        .subscribe(kind)
        .await
        .map_err(repository_error)?;

    let events: FeedEvents = feed
        .map(|snapshot| Event::default().event("snapshot").json_data(snapshot))
        .boxed();

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Audit trail of resolved claims
pub async fn list_logs(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<LostAndFoundLog>>, ApiError> {
    let logs = app_state
        .item_repository
        .list_logs()
        .await
        .map_err(repository_error)?;

    Ok(Json(logs))
}
