/// API routes and handlers
pub mod events;
pub mod health;
pub mod middleware;

use crate::context::AppContext;
use axum::Router;

/// Build API routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .merge(events::routes())
        .merge(health::routes())
}
