//! Session-cookie signing keys.
//!
//! Google publishes the signing certificates as a JSON object mapping `kid` to a
//! PEM encoded X.509 certificate. The response carries `Cache-Control: max-age`,
//! which decides how long the parsed keys stay valid.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use reqwest::header::{CACHE_CONTROL, HeaderMap};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};
use url::Url;
use x509_parser::prelude::{FromDer, X509Certificate};

use crate::services::firebase::error::AuthError;

const ENDPOINT: &str = "public keys";

struct CachedKeys {
    keys: HashMap<String, DecodingKey>,
    expires_at: Instant,
}

impl CachedKeys {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

pub struct PublicKeyCache {
    http: reqwest::Client,
    url: Url,
    cached: RwLock<Option<CachedKeys>>,
    refresh: Mutex<()>,
}

impl std::fmt::Debug for PublicKeyCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicKeyCache")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl PublicKeyCache {
    pub fn new(http: reqwest::Client, url: Url) -> Self {
        Self {
            http,
            url,
            cached: RwLock::new(None),
            refresh: Mutex::new(()),
        }
    }

    /// Look up the decoding key for `kid`.
    ///
    /// While the cached set is fresh it is authoritative: an unknown `kid` is
    /// rejected without going back to Google. Only an expired (or empty) cache
    /// triggers a fetch, and concurrent callers share a single one.
    pub async fn key_for(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        if let Some(found) = self.lookup_fresh(kid).await {
            return found;
        }

        let _refreshing = self.refresh.lock().await;

        // Another task may have refreshed while we waited.
        if let Some(found) = self.lookup_fresh(kid).await {
            return found;
        }

        // No cache lock is held across the fetch; readers keep using the old set.
        let fresh = self.fetch().await?;
        let key = fresh.keys.get(kid).cloned();
        *self.cached.write().await = Some(fresh);

        key.ok_or_else(|| AuthError::UnknownKid(kid.to_string()))
    }

    /// `None` when the cache is empty or expired.
    async fn lookup_fresh(&self, kid: &str) -> Option<Result<DecodingKey, AuthError>> {
        let cached = self.cached.read().await;
        let cached = cached.as_ref().filter(|c| c.is_fresh())?;

        Some(match cached.keys.get(kid) {
            Some(key) => {
                debug!(kid = %kid, "public key cache hit");
                Ok(key.clone())
            }
            None => {
                info!(kid = %kid, "kid not in cached public keys");
                Err(AuthError::UnknownKid(kid.to_string()))
            }
        })
    }

    async fn fetch(&self) -> Result<CachedKeys, AuthError> {
        let response = self
            .http
            .get(self.url.clone())
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

        let ttl = max_age(response.headers()).unwrap_or(Duration::ZERO);
        let certificates: HashMap<String, String> =
            response.json().await.map_err(AuthError::http(ENDPOINT))?;

        let mut keys = HashMap::with_capacity(certificates.len());
        for (kid, pem) in certificates {
            let key = decoding_key_from_certificate(&pem).map_err(|reason| AuthError::PublicKey {
                kid: kid.clone(),
                reason,
            })?;
            keys.insert(kid, key);
        }

        debug!(count = keys.len(), ttl_secs = ttl.as_secs(), "fetched public keys");

        Ok(CachedKeys {
            keys,
            expires_at: Instant::now() + ttl,
        })
    }
}

/// Extract the RSA public key from a PEM encoded X.509 certificate.
pub fn decoding_key_from_certificate(cert_pem: &str) -> Result<DecodingKey, String> {
    let pem = pem::parse(cert_pem).map_err(|e| format!("failed to parse PEM: {e}"))?;
    if pem.tag() != "CERTIFICATE" {
        return Err(format!("unexpected PEM tag {:?}", pem.tag()));
    }

    let (_, cert) = X509Certificate::from_der(pem.contents())
        .map_err(|e| format!("failed to parse X.509: {e:?}"))?;

    // For RSA keys the SPKI bit string is the PKCS#1 RSAPublicKey.
    Ok(DecodingKey::from_rsa_der(
        &cert.public_key().subject_public_key.data,
    ))
}

/// `max-age` directive of the `Cache-Control` header, if any.
fn max_age(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get(CACHE_CONTROL)?.to_str().ok()?;

    value.split(',').find_map(|directive| {
        let (name, secs) = directive.trim().split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("max-age") {
            return None;
        }
        secs.trim().parse::<u64>().ok().map(Duration::from_secs)
    })
}

#[cfg(test)]
impl PublicKeyCache {
    /// Cache that already holds `key` under `kid` and never expires during a test.
    pub fn preloaded(kid: &str, key: DecodingKey) -> Self {
        let url = Url::parse("http://127.0.0.1:9/unused").unwrap();
        Self {
            http: reqwest::Client::new(),
            url,
            cached: RwLock::new(Some(CachedKeys {
                keys: HashMap::from([(kid.to_string(), key)]),
                expires_at: Instant::now() + Duration::from_secs(3600),
            })),
            refresh: Mutex::new(()),
        }
    }
}
