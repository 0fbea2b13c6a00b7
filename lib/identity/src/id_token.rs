//! Identity token verification.
//!
//! Tokens are always signature-checked. Where the verification keys come
//! from is abstracted behind [`SigningKeys`], so the web app can resolve
//! them from the provider's published key set while tests use a fixed
//! shared secret.

use crate::claims::IdentityClaims;
use crate::error::TokenError;
use crate::oauth::OAuthSettings;
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Source of keys for verifying identity token signatures.
#[async_trait]
pub trait SigningKeys: Send + Sync {
    /// Resolves the key that verifies a token carrying `header`.
    ///
    /// Implementations must reject algorithms they do not expect, since the
    /// header is attacker-controlled.
    async fn resolve(&self, header: &Header) -> Result<DecodingKey, TokenError>;
}

/// A single fixed key accepted only with one algorithm.
#[derive(Clone)]
pub struct StaticKey {
    key: DecodingKey,
    algorithm: Algorithm,
}

impl StaticKey {
    /// Creates a key source for `key` used with `algorithm`.
    #[must_use]
    pub fn new(key: DecodingKey, algorithm: Algorithm) -> Self {
        Self { key, algorithm }
    }

    /// Creates an HS256 key source from a shared secret.
    #[must_use]
    pub fn hmac(secret: &[u8]) -> Self {
        Self::new(DecodingKey::from_secret(secret), Algorithm::HS256)
    }
}

#[async_trait]
impl SigningKeys for StaticKey {
    async fn resolve(&self, header: &Header) -> Result<DecodingKey, TokenError> {
        if header.alg != self.algorithm {
            return Err(TokenError::UnsupportedAlgorithm {
                algorithm: format!("{:?}", header.alg),
            });
        }
        Ok(self.key.clone())
    }
}

/// Verifies identity tokens and extracts the profile claims.
#[derive(Clone)]
pub struct IdTokenVerifier {
    keys: Arc<dyn SigningKeys>,
    audience: String,
    issuer: Option<String>,
}

impl IdTokenVerifier {
    /// Creates a verifier expecting tokens issued for `audience`.
    #[must_use]
    pub fn new(keys: Arc<dyn SigningKeys>, audience: String, issuer: Option<String>) -> Self {
        Self {
            keys,
            audience,
            issuer,
        }
    }

    /// Creates a verifier for the client described by `settings`.
    #[must_use]
    pub fn from_settings(keys: Arc<dyn SigningKeys>, settings: &OAuthSettings) -> Self {
        Self::new(
            keys,
            settings.client_id().to_string(),
            settings.issuer().map(str::to_string),
        )
    }

    /// Verifies `raw` and returns its name and email claims.
    ///
    /// # Errors
    ///
    /// Fails if the token is malformed, no key verifies it, the audience,
    /// issuer or expiry are wrong, or a profile claim is missing.
    pub async fn verify(&self, raw: &str) -> Result<IdentityClaims, TokenError> {
        let header = jsonwebtoken::decode_header(raw).map_err(|e| TokenError::Malformed {
            reason: e.to_string(),
        })?;
        let key = self.keys.resolve(&header).await?;

        let mut validation = Validation::new(header.alg);
        validation.set_audience(&[self.audience.as_str()]);
        if let Some(issuer) = &self.issuer {
            validation.set_issuer(&[issuer.as_str()]);
        }

        let data = jsonwebtoken::decode::<Map<String, Value>>(raw, &key, &validation).map_err(
            |e| TokenError::Invalid {
                reason: e.to_string(),
            },
        )?;
        tracing::debug!(kid = ?header.kid, "identity token verified");

        IdentityClaims::from_claims(&data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::EncodingKey;
    use serde_json::json;

    const SECRET: &[u8] = b"test-signing-secret";
    const AUDIENCE: &str = "client-id";

    fn sign(claims: Value, secret: &[u8], algorithm: Algorithm) -> String {
        jsonwebtoken::encode(
            &Header::new(algorithm),
            &claims,
            &EncodingKey::from_secret(secret),
        )
        .expect("encode token")
    }

    fn claims(extra: Value) -> Value {
        let mut claims = json!({
            "aud": AUDIENCE,
            "iss": "https://login.example.com/tenant/v2.0",
            "exp": chrono::Utc::now().timestamp() + 3600,
            "name": "Ada",
            "email": "ada@example.com",
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut claims, extra) {
            base.extend(extra);
        }
        claims
    }

    fn verifier(issuer: Option<&str>) -> IdTokenVerifier {
        IdTokenVerifier::new(
            Arc::new(StaticKey::hmac(SECRET)),
            AUDIENCE.to_string(),
            issuer.map(str::to_string),
        )
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let token = sign(claims(json!({})), SECRET, Algorithm::HS256);

        let identity = verifier(None).verify(&token).await.expect("verify");
        assert_eq!(identity.name, "Ada");
        assert_eq!(identity.email, "ada@example.com");
    }

    #[tokio::test]
    async fn wrong_signature_is_rejected() {
        let token = sign(claims(json!({})), b"some-other-secret", Algorithm::HS256);

        let err = verifier(None).verify(&token).await.expect_err("should fail");
        assert!(matches!(err, TokenError::Invalid { .. }));
    }

    #[tokio::test]
    async fn wrong_audience_is_rejected() {
        let token = sign(
            claims(json!({ "aud": "another-client" })),
            SECRET,
            Algorithm::HS256,
        );

        let err = verifier(None).verify(&token).await.expect_err("should fail");
        assert!(matches!(err, TokenError::Invalid { .. }));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let expired = chrono::Utc::now().timestamp() - 3600;
        let token = sign(claims(json!({ "exp": expired })), SECRET, Algorithm::HS256);

        let err = verifier(None).verify(&token).await.expect_err("should fail");
        assert!(matches!(err, TokenError::Invalid { .. }));
    }

    #[tokio::test]
    async fn pinned_issuer_must_match() {
        let token = sign(claims(json!({})), SECRET, Algorithm::HS256);

        verifier(Some("https://login.example.com/tenant/v2.0"))
            .verify(&token)
            .await
            .expect("matching issuer");

        let err = verifier(Some("https://login.example.com/other/v2.0"))
            .verify(&token)
            .await
            .expect_err("should fail");
        assert!(matches!(err, TokenError::Invalid { .. }));
    }

    #[tokio::test]
    async fn unexpected_algorithm_is_rejected() {
        let token = sign(claims(json!({})), SECRET, Algorithm::HS384);

        let err = verifier(None).verify(&token).await.expect_err("should fail");
        assert_eq!(
            err,
            TokenError::UnsupportedAlgorithm {
                algorithm: "HS384".to_string()
            }
        );
    }

    #[tokio::test]
    async fn garbage_is_malformed() {
        let err = verifier(None)
            .verify("not-a-jwt")
            .await
            .expect_err("should fail");
        assert!(matches!(err, TokenError::Malformed { .. }));
    }

    #[tokio::test]
    async fn missing_profile_claim_is_reported() {
        let mut payload = claims(json!({}));
        if let Value::Object(map) = &mut payload {
            map.remove("email");
        }
        let token = sign(payload, SECRET, Algorithm::HS256);

        let err = verifier(None).verify(&token).await.expect_err("should fail");
        assert_eq!(
            err,
            TokenError::MissingClaim {
                claim: "email".to_string()
            }
        );
    }
}
