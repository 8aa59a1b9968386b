//! Headers stamped on every response of the public listener.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

use super::chain::ChainConfig;

pub const X_FLY_REGION: HeaderName = HeaderName::from_static("x-fly-region");

/// One hundred years, in seconds.
pub const HSTS_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 365 * 100;

#[must_use]
pub fn hsts_value() -> HeaderValue {
    HeaderValue::from_str(&format!("max-age={HSTS_MAX_AGE_SECS}"))
        .unwrap_or_else(|_| HeaderValue::from_static("max-age=31536000"))
}

/// Set the region and HSTS headers, replacing whatever a later stage wrote.
pub fn apply(headers: &mut HeaderMap, config: &ChainConfig) {
    let region = HeaderValue::from_str(config.region_label()).unwrap_or_else(|_| {
        tracing::warn!(region = %config.region_label(), "region is not a valid header value");
        HeaderValue::from_static("unknown")
    });
    headers.insert(X_FLY_REGION, region);
    headers.insert(header::STRICT_TRANSPORT_SECURITY, hsts_value());
}
