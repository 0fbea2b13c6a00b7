//! Authentication routes for the authorization code callback and logout.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use entra_samples_identity::SessionError;
use serde::Deserialize;

use super::{AppState, CurrentSession, OAuthError, found};

/// Path the identity provider redirects back to.
pub const CALLBACK_PATH: &str = "/login/callback";

/// Query parameters for the authorization code callback.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// Completes sign-in once the authentication middleware has let the user through.
pub async fn login() -> Response {
    found("/")
}

/// Handles the provider's redirect after the user signs in.
pub async fn callback(
    State(state): State<AppState>,
    CurrentSession(mut session): CurrentSession,
    Query(query): Query<CallbackQuery>,
    jar: PrivateCookieJar,
) -> Result<Response, AuthError> {
    let state_matches = query
        .state
        .as_deref()
        .is_some_and(|candidate| session.state_matches(candidate));
    if !state_matches {
        return Err(AuthError::StateMismatch);
    }

    if let Some(error) = query.error {
        return Err(AuthError::Provider {
            error,
            description: query.error_description,
        });
    }

    let code = query.code.ok_or(AuthError::MissingCode)?;

    let claims = state.oauth.exchange_code(&code).await?;
    tracing::info!(email = %claims.email, "user signed in");

    let jar = state
        .sessions
        .save_login(jar, &mut session, claims.into_fields())?;

    Ok((jar, found("/")).into_response())
}

/// Logs out the user by removing the session cookie.
pub async fn logout(State(state): State<AppState>, jar: PrivateCookieJar) -> Response {
    (state.sessions.clear(jar), found("/")).into_response()
}

/// Authentication errors.
#[derive(Debug)]
pub enum AuthError {
    StateMismatch,
    Provider {
        error: String,
        description: Option<String>,
    },
    MissingCode,
    OAuth(OAuthError),
    Session(SessionError),
}

impl From<OAuthError> for AuthError {
    fn from(e: OAuthError) -> Self {
        Self::OAuth(e)
    }
}

impl From<SessionError> for AuthError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StateMismatch => write!(f, "callback state does not match session"),
            Self::Provider {
                error,
                description: Some(description),
            } => write!(f, "provider returned {}: {}", error, description),
            Self::Provider { error, .. } => write!(f, "provider returned {}", error),
            Self::MissingCode => write!(f, "callback is missing the authorization code"),
            Self::OAuth(e) => write!(f, "{}", e),
            Self::Session(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AuthError {}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::StateMismatch => (StatusCode::NOT_ACCEPTABLE, "State mismatch"),
            Self::Provider { .. } => (StatusCode::FORBIDDEN, "Sign-in was not completed"),
            Self::MissingCode => (StatusCode::BAD_REQUEST, "Missing authorization code"),
            Self::OAuth(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed"),
            Self::Session(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable"),
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "authentication error");
        } else {
            tracing::warn!(error = %self, "authentication rejected");
        }

        (status, message).into_response()
    }
}
