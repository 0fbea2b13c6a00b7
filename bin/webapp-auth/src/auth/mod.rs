//! Sign-in with the Microsoft identity platform.
//!
//! This module provides:
//! - Cookie-backed sessions and the middleware that establishes them
//! - The authentication middleware guarding protected routes
//! - The authorization code callback and logout routes
//! - The OAuth2 client and the provider signing-key resolver
//!
//! # Request flow
//!
//! Every request passes through [`session::with_session`], which makes sure
//! the browser has a session carrying a random state token. Protected routes
//! are wrapped in [`middleware::require_authentication`], which sends
//! unauthenticated browsers to the provider with that state. The provider
//! returns to [`routes::callback`], which checks the state, exchanges the
//! code, verifies the identity token and records the user in the session.

pub mod jwks;
pub mod middleware;
pub mod oauth;
pub mod routes;
pub mod session;

use axum::extract::FromRef;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;

pub use jwks::JwksKeys;
pub use middleware::{AuthRejection, CurrentSession, require_authentication};
pub use oauth::{OAuthClient, OAuthError};
pub use routes::{callback, login, logout};
pub use session::{SessionStore, with_session};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// OAuth client for the identity provider.
    pub oauth: Arc<OAuthClient>,
    /// Cookie-backed session store.
    pub sessions: SessionStore,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(oauth: OAuthClient, sessions: SessionStore) -> Self {
        Self {
            oauth: Arc::new(oauth),
            sessions,
        }
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.sessions.key().clone()
    }
}

/// Responds `302 Found` pointing at `location`.
pub(crate) fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
