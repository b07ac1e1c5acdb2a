//! Shared fixtures for unit tests: RSA keys, signed cookies, fake verifiers.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use serde::Serialize;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::config::Config;
use crate::services::firebase::public_keys::decoding_key_from_certificate;
use crate::services::firebase::{AuthError, ServiceAccountCredentials, SessionClaims};
use crate::services::session::SessionVerifier;

pub const PROJECT_ID: &str = "demo-session-gate";
pub const CLIENT_EMAIL: &str = "firebase-adminsdk@demo-session-gate.iam.gserviceaccount.com";
pub const PRIVATE_KEY_ID: &str = "sa-key-1";
pub const KID: &str = "session-key-1";

pub const TEST_KEY_PEM: &str = include_str!("../testdata/test_key.pem");
pub const TEST_CERT_PEM: &str = include_str!("../testdata/test_cert.pem");
pub const OTHER_KEY_PEM: &str = include_str!("../testdata/other_key.pem");

pub fn decoding_key() -> DecodingKey {
    decoding_key_from_certificate(TEST_CERT_PEM).unwrap()
}

/// Body served by the public-keys endpoint: `kid -> certificate`.
pub fn certificate_map() -> HashMap<&'static str, &'static str> {
    HashMap::from([(KID, TEST_CERT_PEM)])
}

#[derive(Debug, Clone, Serialize)]
pub struct CookieClaims {
    pub iss: String,
    pub aud: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub auth_time: i64,
    pub firebase: serde_json::Value,
}

impl CookieClaims {
    pub fn valid(uid: &str) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            iss: format!("https://session.firebase.google.com/{PROJECT_ID}"),
            aud: PROJECT_ID.to_string(),
            sub: uid.to_string(),
            iat: now - 60,
            exp: now + 3600,
            auth_time: now - 120,
            firebase: json!({ "sign_in_provider": "password", "identities": {} }),
        }
    }
}

pub fn sign_with(private_key_pem: &str, kid: Option<&str>, claims: &CookieClaims) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

pub fn sign_session_cookie(claims: &CookieClaims) -> String {
    sign_with(TEST_KEY_PEM, Some(KID), claims)
}

fn service_account_json(token_uri: &str) -> serde_json::Value {
    json!({
        "type": "service_account",
        "project_id": PROJECT_ID,
        "private_key_id": PRIVATE_KEY_ID,
        "private_key": TEST_KEY_PEM,
        "client_email": CLIENT_EMAIL,
        "client_id": "1234567890",
        "token_uri": token_uri
    })
}

pub fn service_account(token_uri: &str) -> ServiceAccountCredentials {
    ServiceAccountCredentials::from_json(&service_account_json(token_uri).to_string()).unwrap()
}

/// Write a credentials artifact to a unique temp path. Callers remove it.
pub fn write_service_account(token_uri: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("session-gate-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, service_account_json(token_uri).to_string()).unwrap();
    path
}

pub async fn mount_token_endpoint(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "ya29.test-token",
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

pub fn config_with_credentials(path: PathBuf) -> Config {
    let path = path.to_string_lossy().into_owned();
    Config::from_lookup(|key| (key == "FIREBASE_CREDENTIALS").then(|| path.clone())).unwrap()
}

/// In-process stand-in for the identity provider.
pub struct FakeVerifier {
    accepted: Option<String>,
    failure: fn() -> AuthError,
    calls: AtomicUsize,
}

impl FakeVerifier {
    /// Accepts exactly `token`; everything else fails as expired.
    pub fn accepting(token: &str) -> Self {
        Self {
            accepted: Some(token.to_string()),
            failure: || AuthError::Jwt(ErrorKind::ExpiredSignature.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Rejects every cookie with `failure()`.
    pub fn failing(failure: fn() -> AuthError) -> Self {
        Self {
            accepted: None,
            failure,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionVerifier for FakeVerifier {
    async fn verify(&self, cookie: &str) -> Result<SessionClaims, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.accepted.as_deref() != Some(cookie) {
            return Err((self.failure)());
        }

        let now = chrono::Utc::now().timestamp();
        Ok(SessionClaims {
            iss: format!("https://session.firebase.google.com/{PROJECT_ID}"),
            aud: PROJECT_ID.to_string(),
            sub: "user-1".to_string(),
            iat: now,
            exp: now + 3600,
            auth_time: now,
            firebase: None,
        })
    }
}
