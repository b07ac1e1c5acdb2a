/*
 * Responsibility
 * - URL 構造を定義 (GET /auth のみ)
 * - Content-Type: application/json の要求は route_layer で適用する
 */
use axum::{Router, middleware::from_fn, routing::get};

use crate::api::handlers::auth::auth;
use crate::middleware::content_type::require_json_content_type;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth", get(auth))
        .route_layer(from_fn(require_json_content_type))
}
