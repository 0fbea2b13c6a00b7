//! OAuth2 client settings for the Microsoft identity platform.
//!
//! Defaults target the multi-tenant `common` endpoints, so any work or
//! personal Microsoft account can sign in. Every endpoint can be overridden,
//! which also lets tests point the client at a local mock provider.

/// Authorization endpoint of the `common` tenant.
pub const MICROSOFT_AUTHORIZE_URL: &str =
    "https://login.microsoftonline.com/common/oauth2/v2.0/authorize";

/// Token endpoint of the `common` tenant.
pub const MICROSOFT_TOKEN_URL: &str = "https://login.microsoftonline.com/common/oauth2/v2.0/token";

/// Published signing keys of the `common` tenant.
pub const MICROSOFT_JWKS_URL: &str = "https://login.microsoftonline.com/common/discovery/v2.0/keys";

/// Scopes requested by default.
///
/// A non-OpenID scope (`user.read`) is required for the provider to return an
/// access token; with only OpenID scopes it returns just the identity token.
pub const DEFAULT_SCOPES: &[&str] = &["openid", "email", "profile", "offline_access", "user.read"];

/// Provider endpoints used during sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderEndpoints {
    pub authorize_url: String,
    pub token_url: String,
    pub jwks_url: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            authorize_url: MICROSOFT_AUTHORIZE_URL.to_string(),
            token_url: MICROSOFT_TOKEN_URL.to_string(),
            jwks_url: MICROSOFT_JWKS_URL.to_string(),
        }
    }
}

/// Immutable OAuth2 client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthSettings {
    client_id: String,
    client_secret: String,
    endpoints: ProviderEndpoints,
    redirect_url: String,
    scopes: Vec<String>,
    /// Expected `iss` claim. Unset for multi-tenant sign-in, where the
    /// issuer names the user's own tenant.
    issuer: Option<String>,
}

impl OAuthSettings {
    /// Creates settings requesting [`DEFAULT_SCOPES`] from `endpoints`.
    #[must_use]
    pub fn new(
        client_id: String,
        client_secret: String,
        redirect_url: String,
        endpoints: ProviderEndpoints,
        issuer: Option<String>,
    ) -> Self {
        Self {
            client_id,
            client_secret,
            endpoints,
            redirect_url,
            scopes: DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect(),
            issuer,
        }
    }

    /// Returns the OAuth2 client ID.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Returns the OAuth2 client secret.
    #[must_use]
    pub fn client_secret(&self) -> &str {
        &self.client_secret
    }

    /// Returns the authorization endpoint.
    #[must_use]
    pub fn authorize_url(&self) -> &str {
        &self.endpoints.authorize_url
    }

    /// Returns the token endpoint.
    #[must_use]
    pub fn token_url(&self) -> &str {
        &self.endpoints.token_url
    }

    /// Returns the URL of the provider's published signing keys.
    #[must_use]
    pub fn jwks_url(&self) -> &str {
        &self.endpoints.jwks_url
    }

    /// Returns the redirect URL registered with the provider.
    #[must_use]
    pub fn redirect_url(&self) -> &str {
        &self.redirect_url
    }

    /// Returns the scopes to request.
    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }

    /// Returns the expected token issuer, if pinned.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(endpoints: ProviderEndpoints, issuer: Option<String>) -> OAuthSettings {
        OAuthSettings::new(
            "client-id".to_string(),
            "client-secret".to_string(),
            "http://localhost:8080/login/callback".to_string(),
            endpoints,
            issuer,
        )
    }

    #[test]
    fn default_endpoints_target_microsoft_common() {
        let settings = settings(ProviderEndpoints::default(), None);

        assert_eq!(settings.client_id(), "client-id");
        assert_eq!(settings.client_secret(), "client-secret");
        assert_eq!(settings.authorize_url(), MICROSOFT_AUTHORIZE_URL);
        assert_eq!(settings.token_url(), MICROSOFT_TOKEN_URL);
        assert_eq!(settings.jwks_url(), MICROSOFT_JWKS_URL);
        assert_eq!(
            settings.redirect_url(),
            "http://localhost:8080/login/callback"
        );
        assert!(settings.issuer().is_none());
    }

    #[test]
    fn default_scopes_include_non_openid_scope() {
        let settings = settings(ProviderEndpoints::default(), None);
        let scopes: Vec<&str> = settings.scopes().iter().map(String::as_str).collect();

        assert!(scopes.contains(&"openid"));
        assert!(scopes.contains(&"email"));
        assert!(scopes.contains(&"profile"));
        assert!(scopes.contains(&"user.read"));
    }

    #[test]
    fn endpoints_and_issuer_can_be_overridden() {
        let endpoints = ProviderEndpoints {
            authorize_url: "http://127.0.0.1:9000/authorize".to_string(),
            token_url: "http://127.0.0.1:9000/token".to_string(),
            jwks_url: "http://127.0.0.1:9000/keys".to_string(),
        };
        let settings = settings(endpoints, Some("http://127.0.0.1:9000".to_string()));

        assert_eq!(settings.authorize_url(), "http://127.0.0.1:9000/authorize");
        assert_eq!(settings.token_url(), "http://127.0.0.1:9000/token");
        assert_eq!(settings.jwks_url(), "http://127.0.0.1:9000/keys");
        assert_eq!(settings.issuer(), Some("http://127.0.0.1:9000"));
    }
}
