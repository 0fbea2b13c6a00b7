//! Web app configuration.
//!
//! Loaded once at startup via the `config` crate from environment variables
//! (a sibling `.env` file is read first). Variable names are matched
//! case-insensitively against the field names below, so `MSFT_CLIENT_ID`
//! populates `client_id`.

use axum_extra::extract::cookie::Key;
use entra_samples_identity::{OAuthSettings, ProviderEndpoints};
use rootcause::Report;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

use crate::auth::routes::CALLBACK_PATH;

/// Minimum length of `COOKIE_KEY`, in bytes.
pub const MIN_COOKIE_KEY_LEN: usize = 32;

/// Upper bound for `TOKEN_TIMEOUT_SECONDS`.
pub const MAX_TOKEN_TIMEOUT_SECONDS: u64 = 300;

/// Upper bound for `SESSION_MAX_AGE_HOURS` (one year).
pub const MAX_SESSION_MAX_AGE_HOURS: i64 = 24 * 365;

/// Web app configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebAppConfig {
    /// Scheme of the externally visible redirect URL.
    #[serde(default = "default_redirect_scheme")]
    pub redirect_scheme: String,

    /// Host (and port) of the externally visible redirect URL.
    #[serde(default = "default_redirect_hostname")]
    pub redirect_hostname: String,

    /// Application (client) ID registered with the Microsoft identity platform.
    #[serde(rename = "msft_client_id")]
    pub client_id: String,

    /// Client secret registered with the Microsoft identity platform.
    #[serde(rename = "msft_client_secret")]
    pub client_secret: String,

    /// Master key for encrypting the session cookie.
    /// A random key is generated when unset, which invalidates sessions on restart.
    #[serde(default)]
    pub cookie_key: Option<String>,

    /// Address the HTTP server listens on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Timeout for requests to the identity provider, in seconds.
    #[serde(default = "default_token_timeout_seconds")]
    pub token_timeout_seconds: u64,

    /// Lifetime of the session cookie, in hours.
    #[serde(default = "default_session_max_age_hours")]
    pub session_max_age_hours: i64,

    /// Overrides the provider's authorization endpoint.
    #[serde(default, rename = "msft_authorize_url")]
    pub authorize_url: Option<String>,

    /// Overrides the provider's token endpoint.
    #[serde(default, rename = "msft_token_url")]
    pub token_url: Option<String>,

    /// Overrides the provider's signing keys URL.
    #[serde(default, rename = "msft_jwks_url")]
    pub jwks_url: Option<String>,

    /// Pins the expected identity token issuer (single-tenant apps).
    #[serde(default, rename = "msft_issuer")]
    pub issuer: Option<String>,
}

fn default_redirect_scheme() -> String {
    "http".to_string()
}

fn default_redirect_hostname() -> String {
    "localhost:8080".to_string()
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_token_timeout_seconds() -> u64 {
    10
}

fn default_session_max_age_hours() -> i64 {
    // 30 days
    720
}

impl WebAppConfig {
    /// Loads configuration from a `.env` file and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `MSFT_CLIENT_ID` or `MSFT_CLIENT_SECRET` is
    /// missing, a value cannot be parsed, or a duration is out of range.
    pub fn from_env() -> Result<Self, Report<config::ConfigError>> {
        if let Err(e) = dotenvy::dotenv() {
            tracing::debug!(error = %e, "no .env file loaded");
        }
        Ok(Self::load(None)?)
    }

    /// Loads configuration from an explicit set of variables.
    ///
    /// # Errors
    ///
    /// Same as [`WebAppConfig::from_env`].
    pub fn from_source(vars: HashMap<String, String>) -> Result<Self, config::ConfigError> {
        Self::load(Some(vars))
    }

    fn load(source: Option<HashMap<String, String>>) -> Result<Self, config::ConfigError> {
        let config: Self = config::Config::builder()
            .add_source(config::Environment::default().source(source))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), config::ConfigError> {
        if !(1..=MAX_TOKEN_TIMEOUT_SECONDS).contains(&self.token_timeout_seconds) {
            return Err(config::ConfigError::Message(format!(
                "TOKEN_TIMEOUT_SECONDS must be between 1 and {MAX_TOKEN_TIMEOUT_SECONDS}"
            )));
        }
        if !(1..=MAX_SESSION_MAX_AGE_HOURS).contains(&self.session_max_age_hours) {
            return Err(config::ConfigError::Message(format!(
                "SESSION_MAX_AGE_HOURS must be between 1 and {MAX_SESSION_MAX_AGE_HOURS}"
            )));
        }
        Ok(())
    }

    /// Returns the URL the provider redirects back to after sign-in.
    #[must_use]
    pub fn redirect_url(&self) -> String {
        format!(
            "{}://{}{}",
            self.redirect_scheme, self.redirect_hostname, CALLBACK_PATH
        )
    }

    /// Returns true if cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn secure_cookies(&self) -> bool {
        self.redirect_scheme.eq_ignore_ascii_case("https")
    }

    /// Returns the timeout applied to provider requests.
    #[must_use]
    pub fn token_timeout(&self) -> Duration {
        Duration::from_secs(self.token_timeout_seconds)
    }

    /// Returns the session cookie lifetime.
    #[must_use]
    pub fn session_max_age(&self) -> time::Duration {
        time::Duration::hours(self.session_max_age_hours)
    }

    /// Builds the OAuth client settings.
    #[must_use]
    pub fn oauth_settings(&self) -> OAuthSettings {
        let defaults = ProviderEndpoints::default();
        let endpoints = ProviderEndpoints {
            authorize_url: self.authorize_url.clone().unwrap_or(defaults.authorize_url),
            token_url: self.token_url.clone().unwrap_or(defaults.token_url),
            jwks_url: self.jwks_url.clone().unwrap_or(defaults.jwks_url),
        };
        OAuthSettings::new(
            self.client_id.clone(),
            self.client_secret.clone(),
            self.redirect_url(),
            endpoints,
            self.issuer.clone(),
        )
    }

    /// Derives the session cookie key from `COOKIE_KEY`, or generates one.
    ///
    /// # Errors
    ///
    /// Returns an error if `COOKIE_KEY` is shorter than [`MIN_COOKIE_KEY_LEN`] bytes.
    pub fn session_key(&self) -> Result<Key, config::ConfigError> {
        match self.cookie_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) if key.len() < MIN_COOKIE_KEY_LEN => Err(config::ConfigError::Message(
                format!("COOKIE_KEY must be at least {MIN_COOKIE_KEY_LEN} bytes"),
            )),
            Some(key) => Ok(Key::derive_from(key.as_bytes())),
            None => {
                tracing::warn!("COOKIE_KEY is not set, generating a random session key");
                Ok(Key::generate())
            }
        }
    }
}
