//! Factory: build `FirebaseAuth` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::firebase::{
    AccessTokenSource, CredentialsError, FirebaseAuth, PublicKeyCache, ServiceAccountCredentials,
    SessionCookieVerifier, UserLookup,
};

pub fn build_firebase_auth(config: &Config) -> Result<Arc<FirebaseAuth>, CredentialsError> {
    let credentials = ServiceAccountCredentials::from_file(&config.firebase_credentials)?;
    let project_id = resolve_project_id(
        config.firebase_project_id.as_deref(),
        &credentials,
        std::env::var("GOOGLE_CLOUD_PROJECT").ok().as_deref(),
    )?;

    // One client (and connection pool) for every outbound call.
    let http = reqwest::Client::builder()
        .timeout(config.firebase_http_timeout)
        .build()
        .map_err(|e| CredentialsError::HttpClient(e.to_string()))?;

    let tokens = Arc::new(AccessTokenSource::new(http.clone(), &credentials)?);
    let keys = Arc::new(PublicKeyCache::new(
        http.clone(),
        config.firebase_public_keys_url.clone(),
    ));

    let cookies =
        SessionCookieVerifier::new(keys, &project_id, config.session_cookie_leeway_seconds);
    let users = UserLookup::new(http, &config.firebase_auth_api_url, &project_id, tokens);

    Ok(Arc::new(FirebaseAuth::new(project_id, cookies, users)))
}

/// Explicit override first, then the credentials file, then the ambient GCP project.
fn resolve_project_id(
    configured: Option<&str>,
    credentials: &ServiceAccountCredentials,
    ambient: Option<&str>,
) -> Result<String, CredentialsError> {
    configured
        .or(credentials.project_id.as_deref())
        .or(ambient)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or(CredentialsError::MissingProjectId)
}
