//! # ID Token Verification
//!
//! Verifies identity-provider ID tokens and yields the subject id.
//!
//! ## Checks
//! - `kid` header selects one of the provider's published keys
//! - algorithm is the configured one (RS256 for the provider)
//! - signature, expiry, audience (project id) and issuer
//! - non-empty `sub`
//!
//! ## Signing keys
//! A verifier built with `IdTokenVerifier::remote` holds a cache of the
//! provider's published keys. The cache is refetched when its
//! `Cache-Control: max-age` has passed, and when a token names a key id the
//! cache does not hold (rate limited by `min_refetch_interval`). An empty
//! cache after a failed boot fetch is filled on the first token.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::{Duration, Instant};

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::header::CACHE_CONTROL;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use super::errors::{AuthError, AuthResult};
use crate::observability::{log_event_with_fields, Event};

/// Issuer prefix for the identity provider's ID tokens
pub const ISSUER_PREFIX: &str = "https://securetoken.google.com/";

/// Published JWK set for the identity provider's signing keys
pub const DEFAULT_JWKS_URL: &str =
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com";

/// Shortest gap between two refetches triggered by unknown key ids
pub const DEFAULT_MIN_REFETCH_INTERVAL: Duration = Duration::from_secs(30);

/// Verifies an opaque bearer token, returning the subject id
///
/// Object safe so the HTTP state can hold any verifier behind an `Arc`.
pub trait TokenVerifier: Send + Sync {
    fn verify<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = AuthResult<String>> + Send + 'a>>;
}

/// Claims read from a verified ID token
#[derive(Debug, Clone, Deserialize)]
pub struct IdTokenClaims {
    #[serde(default)]
    pub sub: String,
    pub aud: String,
    pub iss: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
}

/// A fetched key set and how long the provider says it stays fresh
#[derive(Debug, Clone)]
pub struct FetchedKeySet {
    pub keys: JwkSet,
    pub max_age: Option<Duration>,
}

/// Where refreshed keys come from
struct KeySource {
    client: reqwest::Client,
    url: String,
}

#[derive(Default)]
struct KeyCache {
    keys: HashMap<String, DecodingKey>,
    /// None means the keys never go stale on their own
    stale_at: Option<Instant>,
}

impl KeyCache {
    fn is_stale(&self, now: Instant) -> bool {
        self.stale_at.map_or(false, |at| now >= at)
    }
}

/// JWT ID-token verifier bound to one project
pub struct IdTokenVerifier {
    project_id: String,
    issuer: String,
    algorithm: Algorithm,
    cache: RwLock<KeyCache>,
    source: Option<KeySource>,
    min_refetch_interval: Duration,
    /// Serializes refetches and remembers when the last one started
    last_fetch: Mutex<Option<Instant>>,
}

impl IdTokenVerifier {
    /// Create a verifier with a fixed set of keys indexed by key id
    pub fn new(
        project_id: impl Into<String>,
        algorithm: Algorithm,
        keys: HashMap<String, DecodingKey>,
    ) -> Self {
        let project_id = project_id.into();
        Self {
            issuer: format!("{}{}", ISSUER_PREFIX, project_id),
            project_id,
            algorithm,
            cache: RwLock::new(KeyCache {
                keys,
                stale_at: None,
            }),
            source: None,
            min_refetch_interval: DEFAULT_MIN_REFETCH_INTERVAL,
            last_fetch: Mutex::new(None),
        }
    }

    /// Create an RS256 verifier with a fixed, already fetched JWK set
    pub fn from_key_set(project_id: impl Into<String>, set: &JwkSet) -> AuthResult<Self> {
        Ok(Self::new(project_id, Algorithm::RS256, decoding_keys(set)?))
    }

    /// Create an RS256 verifier that fetches and refreshes keys from `jwks_url`.
    ///
    /// The cache starts empty; call `refresh` to fill it before serving.
    pub fn remote(
        project_id: impl Into<String>,
        client: reqwest::Client,
        jwks_url: impl Into<String>,
    ) -> Self {
        let mut verifier = Self::new(project_id, Algorithm::RS256, HashMap::new());
        verifier.source = Some(KeySource {
            client,
            url: jwks_url.into(),
        });
        verifier
    }

    pub fn with_min_refetch_interval(mut self, interval: Duration) -> Self {
        self.min_refetch_interval = interval;
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Number of signing keys held
    pub async fn key_count(&self) -> usize {
        self.cache.read().await.keys.len()
    }

    /// Fetch the key set now and replace the cache.
    ///
    /// On failure the cache keeps its previous keys.
    pub async fn refresh(&self) -> AuthResult<usize> {
        let mut last_fetch = self.last_fetch.lock().await;
        *last_fetch = Some(Instant::now());
        self.fetch_into_cache().await
    }

    /// Verify a token and return its claims
    pub async fn verify_claims(&self, token: &str) -> AuthResult<IdTokenClaims> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;
        if header.alg != self.algorithm {
            return Err(AuthError::UnexpectedAlgorithm);
        }

        let kid = header
            .kid
            .ok_or_else(|| AuthError::UnknownKey("<none>".to_string()))?;
        let key = self.key_for(&kid).await?;

        let mut validation = Validation::new(self.algorithm);
        validation.set_audience(&[&self.project_id]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        let data = decode::<IdTokenClaims>(token, &key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAlgorithm => AuthError::UnexpectedAlgorithm,
            ErrorKind::MissingRequiredClaim(claim) if claim == "sub" => AuthError::MissingSubject,
            _ => AuthError::MalformedToken,
        })?;

        if data.claims.sub.is_empty() {
            return Err(AuthError::MissingSubject);
        }

        Ok(data.claims)
    }

    /// Look up a key, refetching the set when it is stale or lacks `kid`
    async fn key_for(&self, kid: &str) -> AuthResult<DecodingKey> {
        {
            let cache = self.cache.read().await;
            if !cache.is_stale(Instant::now()) {
                if let Some(key) = cache.keys.get(kid) {
                    return Ok(key.clone());
                }
            }
        }

        if self.source.is_none() {
            return Err(AuthError::UnknownKey(kid.to_string()));
        }

        {
            let mut last_fetch = self.last_fetch.lock().await;

            // Another request may have refreshed while we waited
            let (held, stale) = {
                let cache = self.cache.read().await;
                (cache.keys.contains_key(kid), cache.is_stale(Instant::now()))
            };

            let throttled = last_fetch
                .map_or(false, |at| at.elapsed() < self.min_refetch_interval);

            if stale || (!held && !throttled) {
                *last_fetch = Some(Instant::now());
                if let Err(e) = self.fetch_into_cache().await {
                    if !held {
                        return Err(e);
                    }
                    // Stale keys still verify until the provider is reachable
                }
            }
        }

        self.cache
            .read()
            .await
            .keys
            .get(kid)
            .cloned()
            .ok_or_else(|| AuthError::UnknownKey(kid.to_string()))
    }

    async fn fetch_into_cache(&self) -> AuthResult<usize> {
        let Some(source) = &self.source else {
            return Ok(self.key_count().await);
        };

        let fetched = fetch_key_set(&source.client, &source.url).await?;
        let keys = decoding_keys(&fetched.keys)?;
        let count = keys.len();

        *self.cache.write().await = KeyCache {
            keys,
            stale_at: fetched.max_age.map(|age| Instant::now() + age),
        };

        let count_str = count.to_string();
        log_event_with_fields(
            Event::SigningKeysRefreshed,
            &[("project_id", &self.project_id), ("keys", &count_str)],
        );

        Ok(count)
    }
}

impl TokenVerifier for IdTokenVerifier {
    fn verify<'a>(
        &'a self,
        token: &'a str,
    ) -> Pin<Box<dyn Future<Output = AuthResult<String>> + Send + 'a>> {
        Box::pin(async move { self.verify_claims(token).await.map(|claims| claims.sub) })
    }
}

/// Index a JWK set by key id. Keys without a `kid` cannot be selected by a
/// token and are skipped.
fn decoding_keys(set: &JwkSet) -> AuthResult<HashMap<String, DecodingKey>> {
    let mut keys = HashMap::new();
    for jwk in &set.keys {
        let Some(kid) = jwk.common.key_id.clone() else {
            continue;
        };
        let key = DecodingKey::from_jwk(jwk)
            .map_err(|e| AuthError::InvalidKey(format!("{}: {}", kid, e)))?;
        keys.insert(kid, key);
    }
    Ok(keys)
}

/// Fetch the identity provider's published signing keys
pub async fn fetch_key_set(client: &reqwest::Client, url: &str) -> AuthResult<FetchedKeySet> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

    let max_age = response
        .headers()
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_max_age);

    let keys = response
        .json::<JwkSet>()
        .await
        .map_err(|e| AuthError::KeyFetch(e.to_string()))?;

    Ok(FetchedKeySet { keys, max_age })
}

/// `max-age` directive of a Cache-Control value
fn parse_max_age(value: &str) -> Option<Duration> {
    value.split(',').find_map(|directive| {
        let (name, seconds) = directive.trim().split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("max-age") {
            return None;
        }
        seconds.trim().parse::<u64>().ok().map(Duration::from_secs)
    })
}
