use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Log one line per request; server errors are logged at `error`
///
/// Only the path is recorded. Identity headers and query strings stay out of
/// the logs.
pub async fn log_request(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms,
            "Request failed"
        );
    } else {
        tracing::info!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms,
            "Request processed"
        );
    }

    response
}
