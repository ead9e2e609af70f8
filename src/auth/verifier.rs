//! Bearer token verification against a remote JSON Web Key Set.
//!
//! Tokens are RS256 only; no symmetric algorithms, to rule out
//! algorithm-confusion attacks. Keys are fetched from the configured
//! JWKS URL and cached in-process; the cache is refreshed once per
//! unknown key id before a token is rejected.

use std::collections::HashMap;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token has no key id")]
    MissingKeyId,
    #[error("unknown signing key: {0}")]
    UnknownKey(String),
    #[error("failed to fetch key set: {0}")]
    FetchKeys(#[from] reqwest::Error),
    #[error("token lacks required scope: {0}")]
    MissingScope(String),
}

/// Claims we care about. `scope` is the OAuth-style space-delimited list.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub scope: Option<String>,
    pub exp: u64,
}

impl Claims {
    /// Whether the space-delimited `scope` claim contains `scope`.
    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scope
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .any(|s| s == scope)
    }
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Debug, Deserialize)]
struct Jwk {
    kty: String,
    kid: Option<String>,
    n: Option<String>,
    e: Option<String>,
}

/// Verifies bearer tokens against a remote key set.
pub struct TokenVerifier {
    http: reqwest::Client,
    jwks_url: String,
    issuer: Option<String>,
    audience: Option<String>,
    required_scope: String,
    keys: RwLock<HashMap<String, DecodingKey>>,
}

impl TokenVerifier {
    /// Build a verifier from config. Returns `None` when no JWKS URL is
    /// configured, i.e. the post-creation gate is disabled.
    #[must_use]
    pub fn from_config(config: &Config) -> Option<Self> {
        let jwks_url = config.auth_jwks_url.clone()?;
        Some(Self {
            http: reqwest::Client::new(),
            jwks_url,
            issuer: config.auth_issuer.clone(),
            audience: config.auth_audience.clone(),
            required_scope: config.auth_required_scope.clone(),
            keys: RwLock::new(HashMap::new()),
        })
    }

    /// The scope a token must carry to pass [`Self::authorize`].
    #[must_use]
    pub fn required_scope(&self) -> &str {
        &self.required_scope
    }

    /// Verify a bearer token's signature and standard claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed, signed by an unknown
    /// key, expired, or fails issuer/audience checks.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let key = match self.cached_key(&kid).await {
            Some(key) => key,
            None => {
                // Key rotation: refresh the set once before giving up.
                self.refresh_keys().await?;
                self.cached_key(&kid)
                    .await
                    .ok_or_else(|| AuthError::UnknownKey(kid.clone()))?
            }
        };

        let mut validation = Validation::new(Algorithm::RS256);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer]);
        }
        if let Some(audience) = &self.audience {
            validation.set_audience(&[audience]);
        } else {
            validation.validate_aud = false;
        }

        let data = decode::<Claims>(token, &key, &validation)?;
        Ok(data.claims)
    }

    /// Check that verified claims carry the required scope.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingScope` if they do not.
    pub fn authorize(&self, claims: &Claims) -> Result<(), AuthError> {
        if claims.has_scope(&self.required_scope) {
            Ok(())
        } else {
            Err(AuthError::MissingScope(self.required_scope.clone()))
        }
    }

    async fn cached_key(&self, kid: &str) -> Option<DecodingKey> {
        self.keys.read().await.get(kid).cloned()
    }

    async fn refresh_keys(&self) -> Result<(), AuthError> {
        debug!(url = %self.jwks_url, "Fetching JWKS");

        let jwks: JwkSet = self
            .http
            .get(&self.jwks_url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let mut keys = self.keys.write().await;
        keys.clear();
        for jwk in jwks.keys {
            if jwk.kty != "RSA" {
                continue;
            }
            let (Some(kid), Some(n), Some(e)) = (jwk.kid, jwk.n, jwk.e) else {
                continue;
            };
            match DecodingKey::from_rsa_components(&n, &e) {
                Ok(key) => {
                    keys.insert(kid, key);
                }
                Err(e) => {
                    tracing::warn!(kid = %kid, "Skipping unparseable JWK: {e}");
                }
            }
        }

        info!(count = keys.len(), "JWKS refreshed");
        Ok(())
    }
}
