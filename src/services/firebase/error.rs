use jsonwebtoken::Algorithm;
use thiserror::Error;

/// Runtime failures while verifying a session cookie.
///
/// Callers collapse every variant into the same 401; the variants only exist
/// so the log line says what actually went wrong.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("http request to {endpoint} failed: {source}")]
    Http {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {endpoint}: {status}")]
    UnexpectedStatus {
        endpoint: &'static str,
        status: reqwest::StatusCode,
    },
    #[error("invalid public key certificate for kid {kid}: {reason}")]
    PublicKey { kid: String, reason: String },
    #[error("session cookie has no 'kid' header")]
    MissingKid,
    #[error("session cookie has invalid algorithm: {0:?}")]
    InvalidAlgorithm(Algorithm),
    #[error("no public key found for kid {0}")]
    UnknownKid(String),
    #[error("session cookie verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("session cookie has invalid '{0}' claim")]
    InvalidClaim(&'static str),
    #[error("failed to sign access token assertion: {0}")]
    Assertion(#[source] jsonwebtoken::errors::Error),
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("user has been disabled")]
    UserDisabled,
    #[error("session cookie has been revoked")]
    SessionRevoked,
}

impl AuthError {
    pub(crate) fn http(endpoint: &'static str) -> impl FnOnce(reqwest::Error) -> Self {
        move |source| Self::Http { endpoint, source }
    }
}
