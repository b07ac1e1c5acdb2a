//! Route guard: `/auth` only matches requests that declare `Content-Type: application/json`.
//!
//! Anything else is answered exactly like an unknown route (404), so the
//! header acts as part of the route match rather than as a validation error.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

pub async fn require_json_content_type(req: Request<Body>, next: Next) -> Response {
    let is_json = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("application/json"));

    if !is_json {
        tracing::debug!(uri = %req.uri(), "route requires Content-Type: application/json");
        return StatusCode::NOT_FOUND.into_response();
    }

    next.run(req).await
}
