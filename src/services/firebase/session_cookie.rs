//! Firebase session cookie (JWT) verification - signature + claims.
//!
//! Revocation is not checked here; see `FirebaseAuth`.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, Validation};
use serde::Deserialize;

use crate::services::firebase::error::AuthError;
use crate::services::firebase::public_keys::PublicKeyCache;

const SESSION_ISSUER_PREFIX: &str = "https://session.firebase.google.com/";
const MAX_SUB_LEN: usize = 128;

/// Claims carried by a verified session cookie.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub auth_time: i64,

    #[serde(default)]
    pub firebase: Option<FirebaseClaim>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FirebaseClaim {
    #[serde(default)]
    pub sign_in_provider: Option<String>,
}

#[derive(Debug)]
pub struct SessionCookieVerifier {
    keys: Arc<PublicKeyCache>,
    validation: Validation,
    leeway_seconds: i64,
}

impl SessionCookieVerifier {
    pub fn new(keys: Arc<PublicKeyCache>, project_id: &str, leeway_seconds: u64) -> Self {
        let issuer = format!("{SESSION_ISSUER_PREFIX}{project_id}");

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[project_id]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = leeway_seconds;

        Self {
            keys,
            validation,
            leeway_seconds: i64::try_from(leeway_seconds).unwrap_or(i64::MAX),
        }
    }

    /// Verify signature, `iss`/`aud`/`exp` and the Firebase-specific claim rules.
    pub async fn verify(&self, cookie: &str) -> Result<SessionClaims, AuthError> {
        let header = jsonwebtoken::decode_header(cookie)?;

        // Never trust the algorithm from the token beyond this equality check.
        if header.alg != Algorithm::RS256 {
            return Err(AuthError::InvalidAlgorithm(header.alg));
        }

        let kid = header
            .kid
            .filter(|kid| !kid.is_empty())
            .ok_or(AuthError::MissingKid)?;

        let key = self.keys.key_for(&kid).await?;
        let data = jsonwebtoken::decode::<SessionClaims>(cookie, &key, &self.validation)?;

        self.check_claims(&data.claims, chrono::Utc::now().timestamp())?;

        Ok(data.claims)
    }

    fn check_claims(&self, claims: &SessionClaims, now: i64) -> Result<(), AuthError> {
        if claims.sub.is_empty() || claims.sub.chars().count() > MAX_SUB_LEN {
            return Err(AuthError::InvalidClaim("sub"));
        }

        let latest = now.saturating_add(self.leeway_seconds);
        if claims.iat > latest {
            return Err(AuthError::InvalidClaim("iat"));
        }
        if claims.auth_time > latest {
            return Err(AuthError::InvalidClaim("auth_time"));
        }

        Ok(())
    }
}
