//! Request counters and latency histograms for every request, including
//! ones a later stage redirects or replays.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};

use crate::metrics::{REQUESTS_TOTAL, REQUEST_DURATION};

pub async fn track_metrics(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    counter!(REQUESTS_TOTAL, "method" => method.clone(), "status_code" => status.clone())
        .increment(1);
    histogram!(REQUEST_DURATION, "method" => method, "status_code" => status)
        .record(start.elapsed().as_secs_f64());

    response
}
