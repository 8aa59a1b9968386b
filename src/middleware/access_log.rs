//! One log line per request that reaches the renderer: method, path,
//! status, response size and latency, tagged with a request id.

use std::time::Instant;

use axum::extract::Request;
use axum::http::{header, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Reuse the caller's request id when it sent a usable one.
#[must_use]
pub fn request_id(inbound: Option<&HeaderValue>) -> String {
    inbound
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty() && v.len() <= 128)
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from)
}

pub async fn access_log(request: Request, next: Next) -> Response {
    let request_id = request_id(request.headers().get(&X_REQUEST_ID));
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let mut response = next.run(request).await;

    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    let content_length = response
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
        .to_string();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %uri,
        status = response.status().as_u16(),
        content_length = %content_length,
        latency_ms = format_args!("{latency_ms:.3}"),
        "request served"
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(X_REQUEST_ID, value);
    }
    response
}
