//! OAuth2 authorization code client for the Microsoft identity platform.

use entra_samples_identity::{
    IdTokenVerifier, IdentityClaims, OAuthSettings, SigningKeys, TokenError,
};
use oauth2::basic::{
    BasicErrorResponse, BasicRevocationErrorResponse, BasicTokenIntrospectionResponse,
    BasicTokenType,
};
use oauth2::{
    AuthType, AuthUrl, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointNotSet,
    EndpointSet, ExtraTokenFields, RedirectUrl, Scope, StandardRevocableToken,
    StandardTokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Token response fields beyond the OAuth2 standard set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IdTokenFields {
    /// Raw identity token, when the `openid` scope was granted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
}

impl ExtraTokenFields for IdTokenFields {}

/// Token endpoint response carrying the identity token.
pub type ProviderTokenResponse = StandardTokenResponse<IdTokenFields, BasicTokenType>;

type ProviderClient = oauth2::Client<
    BasicErrorResponse,
    ProviderTokenResponse,
    BasicTokenIntrospectionResponse,
    StandardRevocableToken,
    BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

/// Client for starting sign-in and redeeming authorization codes.
pub struct OAuthClient {
    client: ProviderClient,
    http_client: reqwest::Client,
    scopes: Vec<Scope>,
    verifier: IdTokenVerifier,
}

impl OAuthClient {
    /// Creates a client from `settings`, verifying identity tokens with `keys`.
    pub fn new(
        settings: &OAuthSettings,
        keys: Arc<dyn SigningKeys>,
        http_client: reqwest::Client,
    ) -> Result<Self, OAuthError> {
        let auth_url = AuthUrl::new(settings.authorize_url().to_string())
            .map_err(|e| OAuthError::Configuration(format!("invalid authorize URL: {}", e)))?;
        let token_url = TokenUrl::new(settings.token_url().to_string())
            .map_err(|e| OAuthError::Configuration(format!("invalid token URL: {}", e)))?;
        let redirect_url = RedirectUrl::new(settings.redirect_url().to_string())
            .map_err(|e| OAuthError::Configuration(format!("invalid redirect URL: {}", e)))?;

        let client: ProviderClient =
            oauth2::Client::new(ClientId::new(settings.client_id().to_string()))
                .set_client_secret(ClientSecret::new(settings.client_secret().to_string()))
                .set_auth_type(AuthType::RequestBody)
                .set_auth_uri(auth_url)
                .set_token_uri(token_url)
                .set_redirect_uri(redirect_url);

        let scopes = settings
            .scopes()
            .iter()
            .map(|scope| Scope::new(scope.clone()))
            .collect();

        Ok(Self {
            client,
            http_client,
            scopes,
            verifier: IdTokenVerifier::from_settings(keys, settings),
        })
    }

    /// Builds the HTTP client used for provider requests.
    pub fn http_client(timeout: Duration) -> Result<reqwest::Client, OAuthError> {
        reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| OAuthError::Configuration(format!("failed to create HTTP client: {}", e)))
    }

    /// Returns the provider URL that starts sign-in, carrying `state`.
    pub fn authorization_url(&self, state: &str) -> String {
        let (url, _) = self
            .client
            .authorize_url(|| CsrfToken::new(state.to_string()))
            .add_scopes(self.scopes.iter().cloned())
            .url();
        url.to_string()
    }

    /// Redeems `code` and returns the verified identity claims.
    pub async fn exchange_code(&self, code: &str) -> Result<IdentityClaims, OAuthError> {
        let response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| OAuthError::TokenExchange(format!("token exchange failed: {}", e)))?;

        let id_token = response
            .extra_fields()
            .id_token
            .as_deref()
            .ok_or(OAuthError::MissingIdToken)?;

        self.verifier
            .verify(id_token)
            .await
            .map_err(OAuthError::IdToken)
    }
}

/// Errors from talking to the identity provider.
#[derive(Debug)]
pub enum OAuthError {
    Configuration(String),
    TokenExchange(String),
    MissingIdToken,
    IdToken(TokenError),
}

impl std::fmt::Display for OAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "OAuth configuration error: {}", msg),
            Self::TokenExchange(msg) => write!(f, "{}", msg),
            Self::MissingIdToken => write!(f, "no ID token in token response"),
            Self::IdToken(e) => write!(f, "ID token verification failed: {}", e),
        }
    }
}

impl std::error::Error for OAuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IdToken(e) => Some(e),
            _ => None,
        }
    }
}
