/// Event read endpoints
use crate::{
    context::AppContext,
    error::{ChainError, ServiceResult},
    events::{Event, History},
};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

/// Build event routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/events", get(get_history))
        .route("/events/", get(missing_event_id))
        .route("/events/:event_id", get(get_event))
}

/// Get a single event by key
async fn get_event(
    State(ctx): State<AppContext>,
    Path(event_id): Path<String>,
) -> ServiceResult<Json<Event>> {
    let event = ctx
        .resolver
        .fetch_event(&event_id, ctx.request_deadline())
        .await?;

    Ok(Json(event))
}

/// `/events/` with the id segment left out
async fn missing_event_id() -> ServiceResult<Json<Event>> {
    Err(ChainError::BadRequest("Event ID cannot be empty".to_string()).into())
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    head: Option<String>,
}

/// Get the chain of events ending at `head`, most recent first
async fn get_history(
    State(ctx): State<AppContext>,
    Query(query): Query<HistoryQuery>,
) -> ServiceResult<Json<History>> {
    let head = query.head.unwrap_or_default();

    let history = ctx
        .resolver
        .resolve_history(&head, ctx.request_deadline())
        .await?;

    Ok(Json(history))
}
