//! Authentication configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;
use crate::adapters::auth::OidcConfig;

/// OIDC issuer settings for bearer token validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub issuer_url: String,

    #[serde(default)]
    pub audience: String,

    /// Defaults to `<issuer_url>/.well-known/jwks.json`
    pub jwks_url: Option<String>,

    #[serde(default)]
    pub jwks_cache_ttl_secs: Option<u64>,
}

impl AuthConfig {
    pub fn oidc_config(&self) -> OidcConfig {
        let config = OidcConfig::new(&self.issuer_url, &self.audience)
            .with_jwks_url(self.jwks_url.clone());
        match self.jwks_cache_ttl_secs {
            Some(secs) => config.with_jwks_ttl(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Production requires an HTTPS issuer.
    pub fn validate(&self, environment: Environment) -> Result<(), ValidationError> {
        if self.issuer_url.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__ISSUER_URL"));
        }
        if self.audience.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__AUDIENCE"));
        }
        if environment == Environment::Production && !self.issuer_url.starts_with("https://") {
            return Err(ValidationError::IssuerMustBeHttps);
        }
        Ok(())
    }
}
