//! Session validity check: cookie in, 200 or 401 out.
//!
//! Every failure (missing cookie, unreachable provider, bad token, revoked
//! session) collapses into 401. The cause only shows up in the log.

use async_trait::async_trait;
use axum::http::StatusCode;

use crate::services::firebase::{AuthError, SessionClaims};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "session";

#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// `Ok` only if the cookie is a valid, non-revoked session.
    async fn verify(&self, cookie: &str) -> Result<SessionClaims, AuthError>;
}

pub async fn verify_session(verifier: &dyn SessionVerifier, cookie: Option<&str>) -> StatusCode {
    let Some(cookie) = cookie.filter(|c| !c.is_empty()) else {
        tracing::warn!("session cookie is not provided");
        return StatusCode::UNAUTHORIZED;
    };

    match verifier.verify(cookie).await {
        Ok(claims) => {
            tracing::debug!(
                uid = %claims.sub,
                iss = %claims.iss,
                aud = %claims.aud,
                exp = claims.exp,
                auth_time = claims.auth_time,
                provider = ?claims.firebase.as_ref().and_then(|f| f.sign_in_provider.as_deref()),
                "session cookie verified"
            );
            StatusCode::OK
        }
        Err(err) => {
            tracing::warn!(error = %err, "failed to verify session cookie");
            StatusCode::UNAUTHORIZED
        }
    }
}
