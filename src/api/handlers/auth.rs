/*
 * Responsibility
 * - GET /auth: session cookie を取り出して SessionVerifier に委譲
 * - 結果の status を HTTP status と JSON body の両方に使う
 */
use axum::{Json, extract::State, http::StatusCode};
use axum_extra::extract::CookieJar;

use crate::{
    api::dto::auth::AuthResponse,
    services::session::{self, SESSION_COOKIE},
    state::AppState,
};

pub async fn auth(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (StatusCode, Json<AuthResponse>) {
    let cookie = jar.get(SESSION_COOKIE).map(|c| c.value());

    let status = session::verify_session(state.verifier.as_ref(), cookie).await;

    (status, Json(AuthResponse::from(status)))
}
