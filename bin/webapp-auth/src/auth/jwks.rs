//! Signing keys published by the identity provider.
//!
//! The key set is fetched lazily and cached. A token naming a key the cache
//! does not hold triggers one refetch, which picks up provider key rollover.

use async_trait::async_trait;
use entra_samples_identity::{SigningKeys, TokenError};
use jsonwebtoken::jwk::{Jwk, JwkSet};
use jsonwebtoken::{Algorithm, DecodingKey, Header};
use tokio::sync::RwLock;

/// RS256 keys resolved from a JWKS endpoint.
pub struct JwksKeys {
    url: String,
    http_client: reqwest::Client,
    cache: RwLock<JwkSet>,
}

impl JwksKeys {
    /// Creates a resolver for the key set at `url`.
    pub fn new(url: String, http_client: reqwest::Client) -> Self {
        Self {
            url,
            http_client,
            cache: RwLock::new(JwkSet { keys: Vec::new() }),
        }
    }

    async fn cached(&self, kid: &str) -> Option<Jwk> {
        self.cache.read().await.find(kid).cloned()
    }

    async fn refresh(&self) -> Result<(), TokenError> {
        tracing::debug!(url = %self.url, "fetching signing keys");

        let response = self
            .http_client
            .get(&self.url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| TokenError::KeyFetch {
                reason: e.to_string(),
            })?;
        let keys: JwkSet = response.json().await.map_err(|e| TokenError::KeyFetch {
            reason: e.to_string(),
        })?;

        tracing::debug!(count = keys.keys.len(), "signing keys refreshed");
        *self.cache.write().await = keys;
        Ok(())
    }
}

#[async_trait]
impl SigningKeys for JwksKeys {
    async fn resolve(&self, header: &Header) -> Result<DecodingKey, TokenError> {
        if header.alg != Algorithm::RS256 {
            return Err(TokenError::UnsupportedAlgorithm {
                algorithm: format!("{:?}", header.alg),
            });
        }
        let kid = header
            .kid
            .as_deref()
            .ok_or(TokenError::UnknownKey { kid: None })?;

        let jwk = match self.cached(kid).await {
            Some(jwk) => jwk,
            None => {
                self.refresh().await?;
                self.cached(kid).await.ok_or_else(|| TokenError::UnknownKey {
                    kid: Some(kid.to_string()),
                })?
            }
        };

        DecodingKey::from_jwk(&jwk).map_err(|e| TokenError::Invalid {
            reason: e.to_string(),
        })
    }
}
