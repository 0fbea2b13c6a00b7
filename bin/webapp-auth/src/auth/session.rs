//! Cookie-backed session store and the middleware that establishes sessions.
//!
//! The whole session record lives in one private cookie: encrypted and
//! authenticated with the configured key, so the browser can neither read
//! nor alter it. A cookie that fails to decrypt is treated as absent.

use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar, SameSite};
use entra_samples_identity::{SessionData, SessionError};

use super::AppState;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "auth_sample";

/// Loads and persists [`SessionData`] in a private cookie.
#[derive(Clone)]
pub struct SessionStore {
    key: Key,
    secure: bool,
    max_age: time::Duration,
}

impl SessionStore {
    /// Creates a store encrypting cookies with `key`.
    pub fn new(key: Key, secure: bool, max_age: time::Duration) -> Self {
        Self {
            key,
            secure,
            max_age,
        }
    }

    /// Returns the cookie encryption key.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Reads the session from the jar, if present.
    pub fn load(&self, jar: &PrivateCookieJar) -> Result<Option<SessionData>, SessionError> {
        let Some(cookie) = jar.get(SESSION_COOKIE) else {
            return Ok(None);
        };
        serde_json::from_str(cookie.value())
            .map(Some)
            .map_err(|e| SessionError::Load {
                reason: e.to_string(),
            })
    }

    /// Writes the session into the jar.
    pub fn save(
        &self,
        jar: PrivateCookieJar,
        session: &SessionData,
    ) -> Result<PrivateCookieJar, SessionError> {
        let value = serde_json::to_string(session).map_err(|e| SessionError::Save {
            reason: e.to_string(),
        })?;

        let cookie = Cookie::build((SESSION_COOKIE, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(self.max_age);

        Ok(jar.add(cookie))
    }

    /// Marks the session authenticated, merges `fields` into it and saves it.
    pub fn save_login<I, K, V>(
        &self,
        jar: PrivateCookieJar,
        session: &mut SessionData,
        fields: I,
    ) -> Result<PrivateCookieJar, SessionError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        session.record_login(fields);
        self.save(jar, session)
    }

    /// Removes the session cookie.
    pub fn clear(&self, jar: PrivateCookieJar) -> PrivateCookieJar {
        jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
    }
}

/// Ensures every request has a session and exposes it to handlers.
///
/// The session is available downstream as a `SessionData` request extension
/// (see [`CurrentSession`](super::CurrentSession)). If a handler writes the
/// session cookie itself, that cookie takes precedence over the copy saved
/// here.
pub async fn with_session(
    State(state): State<AppState>,
    jar: PrivateCookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let mut session = match state.sessions.load(&jar) {
        Ok(Some(session)) => session,
        Ok(None) => {
            tracing::debug!("no session cookie, starting a new session");
            SessionData::new()
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to read session");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable").into_response();
        }
    };

    if session.ensure_state() {
        tracing::debug!("session had no state, assigned a new one");
    }

    let jar = match state.sessions.save(jar, &session) {
        Ok(jar) => jar,
        Err(e) => {
            tracing::error!(error = %e, "failed to save session");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable").into_response();
        }
    };

    request.extensions_mut().insert(session);
    let response = next.run(request).await;

    if sets_session_cookie(&response) {
        response
    } else {
        (jar, response).into_response()
    }
}

fn sets_session_cookie(response: &Response) -> bool {
    let prefix = format!("{SESSION_COOKIE}=");
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .any(|value| value.starts_with(&prefix))
}
