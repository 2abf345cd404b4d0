//! OIDC bearer-token validator.
//!
//! Validates JWTs against the identity provider's published JWKS. Signature,
//! issuer, audience and expiry are all checked before a user is produced.
//! Keys are fetched lazily and cached. A token naming an unknown `kid`
//! triggers one early refetch, at most once per refresh cooldown, so a key
//! rotation is picked up before the cache expires.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{JwkSet, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Header, Validation};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

const DEFAULT_JWKS_TTL: Duration = Duration::from_secs(3600);
const DEFAULT_JWKS_REFRESH_COOLDOWN: Duration = Duration::from_secs(60);

/// Identity provider settings.
#[derive(Debug, Clone)]
pub struct OidcConfig {
    pub issuer_url: String,
    pub audience: String,
    /// Overrides `<issuer>/.well-known/jwks.json`.
    pub jwks_url: Option<String>,
    pub jwks_ttl: Duration,
    /// Minimum age of the cached set before an unknown `kid` may refetch it.
    pub jwks_refresh_cooldown: Duration,
}

impl OidcConfig {
    pub fn new(issuer_url: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            issuer_url: issuer_url.into(),
            audience: audience.into(),
            jwks_url: None,
            jwks_ttl: DEFAULT_JWKS_TTL,
            jwks_refresh_cooldown: DEFAULT_JWKS_REFRESH_COOLDOWN,
        }
    }

    pub fn with_jwks_ttl(mut self, ttl: Duration) -> Self {
        self.jwks_ttl = ttl;
        self
    }

    pub fn with_jwks_refresh_cooldown(mut self, cooldown: Duration) -> Self {
        self.jwks_refresh_cooldown = cooldown;
        self
    }

    pub fn with_jwks_url(mut self, url: Option<String>) -> Self {
        self.jwks_url = url;
        self
    }

    fn jwks_url(&self) -> String {
        if let Some(url) = &self.jwks_url {
            return url.clone();
        }
        format!(
            "{}/.well-known/jwks.json",
            self.issuer_url.trim_end_matches('/')
        )
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    email_verified: Option<bool>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    preferred_username: Option<String>,
}

struct CachedJwks {
    keys: JwkSet,
    fetched_at: Instant,
}

/// Production `SessionValidator`.
pub struct OidcSessionValidator {
    config: OidcConfig,
    http_client: reqwest::Client,
    jwks: Arc<RwLock<Option<CachedJwks>>>,
}

impl OidcSessionValidator {
    pub fn new(config: OidcConfig) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            config,
            http_client,
            jwks: Arc::new(RwLock::new(None)),
        }
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        let url = self.config.jwks_url();
        tracing::debug!(%url, "Fetching JWKS");

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            tracing::error!(error = %e, "JWKS request failed");
            AuthError::service_unavailable(format!("JWKS request failed: {}", e.without_url()))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!(%status, "JWKS endpoint returned an error");
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        response.json::<JwkSet>().await.map_err(|e| {
            tracing::error!(error = %e, "JWKS body is not a key set");
            AuthError::service_unavailable("JWKS body is not a key set")
        })
    }

    async fn keys(&self) -> Result<JwkSet, AuthError> {
        if let Some(cached) = self.jwks.read().await.as_ref() {
            if cached.fetched_at.elapsed() < self.config.jwks_ttl {
                return Ok(cached.keys.clone());
            }
        }
        self.refresh_keys().await
    }

    /// True when the cached set is old enough to be refetched early.
    async fn early_refresh_allowed(&self) -> bool {
        self.jwks
            .read()
            .await
            .as_ref()
            .map_or(true, |cached| {
                cached.fetched_at.elapsed() >= self.config.jwks_refresh_cooldown
            })
    }

    async fn refresh_keys(&self) -> Result<JwkSet, AuthError> {
        let keys = self.fetch_jwks().await?;
        *self.jwks.write().await = Some(CachedJwks {
            keys: keys.clone(),
            fetched_at: Instant::now(),
        });
        Ok(keys)
    }

    fn decoding_key(header: &Header, jwks: &JwkSet) -> Result<(DecodingKey, Algorithm), AuthError> {
        let kid = header.kid.as_deref().ok_or(AuthError::InvalidToken)?;
        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::warn!(kid, "No JWKS key matches token");
            AuthError::InvalidToken
        })?;

        let algorithm = match jwk.common.key_algorithm {
            None | Some(KeyAlgorithm::RS256) => Algorithm::RS256,
            Some(KeyAlgorithm::RS384) => Algorithm::RS384,
            Some(KeyAlgorithm::RS512) => Algorithm::RS512,
            Some(KeyAlgorithm::ES256) => Algorithm::ES256,
            Some(KeyAlgorithm::ES384) => Algorithm::ES384,
            Some(other) => {
                tracing::warn!(algorithm = ?other, "Unsupported JWKS key algorithm");
                return Err(AuthError::InvalidToken);
            }
        };

        let key = DecodingKey::from_jwk(jwk).map_err(|_| AuthError::InvalidToken)?;
        Ok((key, algorithm))
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[&self.config.issuer_url]);
        validation.set_audience(&[&self.config.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

#[async_trait]
impl SessionValidator for OidcSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::InvalidToken)?;
        let mut jwks = self.keys().await?;
        if let Some(kid) = header.kid.as_deref() {
            if jwks.find(kid).is_none() && self.early_refresh_allowed().await {
                tracing::info!(kid, "Token names an unknown signing key; refetching JWKS");
                jwks = self.refresh_keys().await?;
            }
        }
        let (key, algorithm) = Self::decoding_key(&header, &jwks)?;

        let claims = decode::<Claims>(token, &key, &self.validation(algorithm))
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                kind => {
                    tracing::warn!(error = ?kind, "Token rejected");
                    AuthError::InvalidToken
                }
            })?
            .claims;

        let user_id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(
            user_id,
            claims.email,
            claims.name.or(claims.preferred_username),
            claims.email_verified.unwrap_or(false),
        ))
    }
}

impl std::fmt::Debug for OidcSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcSessionValidator")
            .field("issuer_url", &self.config.issuer_url)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Header {"alg":"RS256","kid":"k1"}, payload {"sub":"u_1"}, junk signature.
    const UNKNOWN_KID_TOKEN: &str = "eyJhbGciOiJSUzI1NiIsImtpZCI6ImsxIn0.eyJzdWIiOiJ1XzEifQ.c2ln";

    #[test]
    fn jwks_url_ignores_trailing_slash() {
        let config = OidcConfig::new("https://id.weightwise.app/", "weightwise-api");
        assert_eq!(
            config.jwks_url(),
            "https://id.weightwise.app/.well-known/jwks.json"
        );
    }

    #[test]
    fn explicit_jwks_url_wins() {
        let config = OidcConfig::new("https://id.weightwise.app", "weightwise-api")
            .with_jwks_url(Some("https://keys.weightwise.app/jwks".to_string()));
        assert_eq!(config.jwks_url(), "https://keys.weightwise.app/jwks");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected_without_fetching_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"keys": []})))
            .expect(0)
            .mount(&server)
            .await;

        let validator = OidcSessionValidator::new(OidcConfig::new(server.uri(), "api"));
        let err = validator.validate("not-a-jwt").await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn unknown_kid_is_invalid_and_keys_are_cached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"keys": []})))
            .expect(1)
            .mount(&server)
            .await;

        let validator = OidcSessionValidator::new(OidcConfig::new(server.uri(), "api"));
        for _ in 0..2 {
            let err = validator.validate(UNKNOWN_KID_TOKEN).await.unwrap_err();
            assert_eq!(err, AuthError::InvalidToken);
        }
    }

    #[tokio::test]
    async fn unknown_kid_refetches_keys_once_after_cooldown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"keys": []})))
            .expect(2)
            .mount(&server)
            .await;

        let config = OidcConfig::new(server.uri(), "api")
            .with_jwks_refresh_cooldown(Duration::ZERO);
        let validator = OidcSessionValidator::new(config);

        let err = validator.validate(UNKNOWN_KID_TOKEN).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
    }

    #[tokio::test]
    async fn rotated_key_is_found_on_refetch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"keys": []})))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "keys": [{"kty": "RSA", "kid": "k1", "alg": "RS256", "n": "sXch", "e": "AQAB"}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = OidcConfig::new(server.uri(), "api")
            .with_jwks_refresh_cooldown(Duration::ZERO);
        let validator = OidcSessionValidator::new(config);

        // The refetched set knows k1; the junk signature is what fails now.
        let err = validator.validate(UNKNOWN_KID_TOKEN).await.unwrap_err();
        assert_eq!(err, AuthError::InvalidToken);
        assert!(validator.jwks.read().await.as_ref().unwrap().keys.find("k1").is_some());
    }

    #[tokio::test]
    async fn jwks_outage_is_transient() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let validator = OidcSessionValidator::new(OidcConfig::new(server.uri(), "api"));
        let err = validator.validate(UNKNOWN_KID_TOKEN).await.unwrap_err();
        assert!(err.is_transient());
    }
}
