//! CORS response headers for browser clients.
//!
//! Note:
//! - Headers are written on every response (including 404/405), before and
//!   regardless of routing. Preflight requests are not short-circuited; they
//!   go through the router like any other request.
//! - Values come from `Config` and default to `*` (any origin/method/header).
//! - `*` is never combined with credentials here; this service does not emit
//!   `Access-Control-Allow-Credentials`.

use axum::Router;
use axum::http::{HeaderValue, header};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CorsConfig;

/// Apply the configured CORS headers to all responses.
///
/// Invalid header values fall back to `*` with a warning instead of failing startup.
pub fn apply(router: Router, cors: &CorsConfig) -> Router {
    router
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            header_value("CORS_ALLOW_ORIGIN", &cors.allow_origin),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            header_value("CORS_ALLOW_METHODS", &cors.allow_methods),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            header_value("CORS_ALLOW_HEADERS", &cors.allow_headers),
        ))
}

fn header_value(key: &'static str, raw: &str) -> HeaderValue {
    HeaderValue::from_str(raw).unwrap_or_else(|_| {
        tracing::warn!(key, value = raw, "invalid CORS header value, using '*'");
        HeaderValue::from_static("*")
    })
}
