/// Request middleware
use crate::metrics;
use axum::{extract::Request, middleware::Next, response::Response};

/// Count every request by method and final status
pub async fn track_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let response = next.run(req).await;

    metrics::record_http_request(method.as_str(), response.status().as_u16());

    response
}
