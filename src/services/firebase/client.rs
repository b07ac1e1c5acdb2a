use async_trait::async_trait;

use crate::services::firebase::error::AuthError;
use crate::services::firebase::session_cookie::{SessionClaims, SessionCookieVerifier};
use crate::services::firebase::users::UserLookup;
use crate::services::session::SessionVerifier;

/// Firebase Authentication client scoped to one project.
///
/// Built once at startup (see `factory`) and shared through `AppState`.
#[derive(Debug)]
pub struct FirebaseAuth {
    project_id: String,
    cookies: SessionCookieVerifier,
    users: UserLookup,
}

impl FirebaseAuth {
    pub fn new(project_id: String, cookies: SessionCookieVerifier, users: UserLookup) -> Self {
        Self {
            project_id,
            cookies,
            users,
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub async fn verify_session_cookie(&self, cookie: &str) -> Result<SessionClaims, AuthError> {
        self.cookies.verify(cookie).await
    }

    /// Verify the cookie, then make sure the user is still enabled and has not
    /// had their sessions revoked since the cookie was issued.
    pub async fn verify_session_cookie_and_check_revoked(
        &self,
        cookie: &str,
    ) -> Result<SessionClaims, AuthError> {
        let claims = self.verify_session_cookie(cookie).await?;
        let user = self.users.get_user(&claims.sub).await?;

        if user.disabled {
            return Err(AuthError::UserDisabled);
        }

        if let Some(valid_after) = user.tokens_valid_after_millis
            && claims.auth_time.saturating_mul(1000) < valid_after
        {
            return Err(AuthError::SessionRevoked);
        }

        tracing::debug!(uid = %user.uid, "session not revoked");
        Ok(claims)
    }
}

#[async_trait]
impl SessionVerifier for FirebaseAuth {
    async fn verify(&self, cookie: &str) -> Result<SessionClaims, AuthError> {
        self.verify_session_cookie_and_check_revoked(cookie).await
    }
}
