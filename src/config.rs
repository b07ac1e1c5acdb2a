/*
 * Responsibility
 * - 環境変数の読み込み (FIREBASE_CREDENTIALS, PORT, CORS, Firebase endpoints)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use url::Url;

pub const DEFAULT_PUBLIC_KEYS_URL: &str =
    "https://www.googleapis.com/identitytoolkit/v3/relyingparty/publicKeys";
pub const DEFAULT_AUTH_API_URL: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(raw: Option<String>) -> Self {
        match raw
            .unwrap_or_else(|| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values written into the CORS response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: String,
    pub allow_headers: String,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: "*".to_string(),
            allow_headers: "*".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    pub firebase_credentials: PathBuf,
    pub firebase_project_id: Option<String>,
    pub firebase_public_keys_url: Url,
    pub firebase_auth_api_url: Url,
    pub firebase_http_timeout: Duration,
    pub session_cookie_leeway_seconds: u64,

    pub cors: CorsConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` is a thin wrapper over this so tests never have to touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Treat blank values the same as unset ones.
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port: u16 = match var("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 8080,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(var("APP_ENV"));

        let firebase_credentials = var("FIREBASE_CREDENTIALS")
            .map(PathBuf::from)
            .ok_or(ConfigError::Missing("FIREBASE_CREDENTIALS"))?;

        let firebase_project_id = var("FIREBASE_PROJECT_ID");

        let firebase_public_keys_url = Url::parse(
            &var("FIREBASE_PUBLIC_KEYS_URL").unwrap_or_else(|| DEFAULT_PUBLIC_KEYS_URL.into()),
        )
        .map_err(|_| ConfigError::Invalid("FIREBASE_PUBLIC_KEYS_URL"))?;

        let firebase_auth_api_url =
            Url::parse(&var("FIREBASE_AUTH_API_URL").unwrap_or_else(|| DEFAULT_AUTH_API_URL.into()))
                .map_err(|_| ConfigError::Invalid("FIREBASE_AUTH_API_URL"))?;

        let firebase_http_timeout = match var("FIREBASE_HTTP_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid("FIREBASE_HTTP_TIMEOUT_SECONDS"))?,
            None => Duration::from_secs(10),
        };

        let session_cookie_leeway_seconds: u64 = match var("SESSION_COOKIE_LEEWAY_SECONDS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("SESSION_COOKIE_LEEWAY_SECONDS"))?,
            None => 300,
        };

        let defaults = CorsConfig::default();
        let cors = CorsConfig {
            allow_origin: var("CORS_ALLOW_ORIGIN").unwrap_or(defaults.allow_origin),
            allow_methods: var("CORS_ALLOW_METHODS").unwrap_or(defaults.allow_methods),
            allow_headers: var("CORS_ALLOW_HEADERS").unwrap_or(defaults.allow_headers),
        };

        Ok(Self {
            addr,
            app_env,
            firebase_credentials,
            firebase_project_id,
            firebase_public_keys_url,
            firebase_auth_api_url,
            firebase_http_timeout,
            session_cookie_leeway_seconds,
            cors,
        })
    }
}
