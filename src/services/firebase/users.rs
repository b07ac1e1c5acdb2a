//! Identity Toolkit user lookup (`accounts:lookup`), used for the revocation check.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use url::Url;

use crate::services::firebase::error::AuthError;
use crate::services::firebase::token_source::AccessTokenSource;

const ENDPOINT: &str = "accounts:lookup";

/// The parts of a user account the revocation check needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub uid: String,
    pub disabled: bool,
    pub tokens_valid_after_millis: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    #[serde(default)]
    disabled: bool,
    // Seconds since epoch, encoded as a string.
    #[serde(default)]
    valid_since: Option<String>,
}

impl From<LookupUser> for UserRecord {
    fn from(user: LookupUser) -> Self {
        let tokens_valid_after_millis = user
            .valid_since
            .and_then(|secs| secs.parse::<i64>().ok())
            .map(|secs| secs.saturating_mul(1000));

        Self {
            uid: user.local_id,
            disabled: user.disabled,
            tokens_valid_after_millis,
        }
    }
}

#[derive(Debug)]
pub struct UserLookup {
    http: reqwest::Client,
    lookup_url: String,
    tokens: Arc<AccessTokenSource>,
}

impl UserLookup {
    pub fn new(
        http: reqwest::Client,
        api_base: &Url,
        project_id: &str,
        tokens: Arc<AccessTokenSource>,
    ) -> Self {
        let lookup_url = format!(
            "{}/projects/{}/accounts:lookup",
            api_base.as_str().trim_end_matches('/'),
            project_id
        );

        Self {
            http,
            lookup_url,
            tokens,
        }
    }

    pub async fn get_user(&self, uid: &str) -> Result<UserRecord, AuthError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(&self.lookup_url)
            .bearer_auth(token)
            .json(&json!({ "localId": [uid] }))
            .send()
            .await
            .map_err(AuthError::http(ENDPOINT))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::UnexpectedStatus {
                endpoint: ENDPOINT,
                status,
            });
        }

        let body: LookupResponse = response.json().await.map_err(AuthError::http(ENDPOINT))?;

        body.users
            .into_iter()
            .next()
            .map(UserRecord::from)
            .ok_or_else(|| AuthError::UserNotFound(uid.to_string()))
    }
}
