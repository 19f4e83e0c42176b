/// Health check endpoints for liveness and readiness probes
///
/// - Liveness: Is the process alive? (restart if not)
/// - Readiness: Can the event store be reached? (remove from load balancer if not)

use crate::context::AppContext;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use std::time::Instant;

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/health/live", get(liveness_probe))
        .route("/health/ready", get(readiness_probe))
}

/// Liveness probe
///
/// Lightweight check that should always succeed while the server responds.
pub async fn liveness_probe(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": ctx.config.service.version,
    }))
}

/// Readiness probe
///
/// Returns 200 when the event backend answers, 503 otherwise.
pub async fn readiness_probe(
    State(ctx): State<AppContext>,
) -> (StatusCode, Json<serde_json::Value>) {
    let start = Instant::now();
    let backend = ctx.resolver.backend();

    match backend.check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ready",
                "backend": backend.name(),
                "response_time_ms": start.elapsed().as_millis() as u64,
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "readiness_probe_failed: event store check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({
                    "status": "unavailable",
                    "backend": backend.name(),
                    "error": e.to_string(),
                })),
            )
        }
    }
}
