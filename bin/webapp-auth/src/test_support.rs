//! Helpers for driving the router against a mocked identity provider.

use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, Key, PrivateCookieJar};
use entra_samples_identity::{OAuthSettings, ProviderEndpoints, SessionData, StaticKey};
use jsonwebtoken::{EncodingKey, Header};
use oauth2::url::Url;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::MockServer;

use crate::app::router;
use crate::auth::session::SESSION_COOKIE;
use crate::auth::{AppState, OAuthClient, SessionStore, routes::CALLBACK_PATH};

pub(crate) const TEST_CLIENT_ID: &str = "client-id";
const TEST_SIGNING_SECRET: &[u8] = b"test-signing-secret";
const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Signs an HS256 identity token accepted by the test verifier.
pub(crate) fn sign_id_token(name: &str, email: &str) -> String {
    let claims = json!({
        "aud": TEST_CLIENT_ID,
        "exp": chrono::Utc::now().timestamp() + 300,
        "name": name,
        "email": email,
    });
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SIGNING_SECRET),
    )
    .expect("sign id token")
}

fn test_settings(server: &MockServer) -> OAuthSettings {
    let endpoints = ProviderEndpoints {
        authorize_url: format!("{}/authorize", server.uri()),
        token_url: format!("{}/token", server.uri()),
        jwks_url: format!("{}/keys", server.uri()),
    };
    OAuthSettings::new(
        TEST_CLIENT_ID.to_string(),
        "client-secret".to_string(),
        format!("http://localhost:8080{CALLBACK_PATH}"),
        endpoints,
        None,
    )
}

/// Creates an OAuth client pointed at `server`, verifying HS256 test tokens.
pub(crate) fn test_oauth_client(server: &MockServer) -> OAuthClient {
    oauth_client_with_timeout(server, DEFAULT_TEST_TIMEOUT)
}

fn oauth_client_with_timeout(server: &MockServer, timeout: Duration) -> OAuthClient {
    OAuthClient::new(
        &test_settings(server),
        Arc::new(StaticKey::hmac(TEST_SIGNING_SECRET)),
        OAuthClient::http_client(timeout).expect("http client"),
    )
    .expect("oauth client")
}

/// The app wired to a mock provider.
pub(crate) struct TestApp {
    pub server: MockServer,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_timeout(DEFAULT_TEST_TIMEOUT).await
    }

    /// Creates an app whose provider requests give up after `timeout`.
    pub async fn with_timeout(timeout: Duration) -> Self {
        let server = MockServer::start().await;
        let sessions = SessionStore::new(Key::generate(), false, time::Duration::hours(1));
        let state = AppState::new(oauth_client_with_timeout(&server, timeout), sessions);
        Self { server, state }
    }

    pub fn authorize_url(&self) -> String {
        format!("{}/authorize", self.server.uri())
    }

    fn router(&self) -> Router {
        router(self.state.clone())
    }

    pub async fn request(&self, request: Request<Body>) -> Response {
        self.router().oneshot(request).await.expect("response")
    }

    pub async fn body(&self, response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        String::from_utf8(bytes.to_vec()).expect("utf-8 body")
    }

    /// Decrypts a `name=value` session cookie pair.
    pub fn decode_session(&self, cookie: &str) -> Option<SessionData> {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, cookie.parse().ok()?);
        let jar = PrivateCookieJar::from_headers(&headers, self.state.sessions.key().clone());
        self.state.sessions.load(&jar).ok().flatten()
    }

    /// Returns the session the browser holds after `response`.
    pub fn session_after(&self, response: &Response, sent: &str) -> Option<SessionData> {
        let cookie = session_cookie(response).unwrap_or_else(|| sent.to_string());
        self.decode_session(&cookie)
    }

    /// Returns a session cookie pair for a signed-in user.
    pub fn authenticated_cookie(&self, name: &str, email: &str) -> String {
        let sessions = &self.state.sessions;
        let mut session = SessionData::new();
        let jar = sessions
            .save_login(
                PrivateCookieJar::new(sessions.key().clone()),
                &mut session,
                [("name", name), ("email", email)],
            )
            .expect("save session");
        session_cookie(&jar.into_response()).expect("session cookie")
    }
}

/// Builds a GET request, optionally carrying a cookie header.
pub(crate) fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

/// Returns the session cookie set by `response` as a `name=value` pair.
pub(crate) fn session_cookie(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| Cookie::parse(v.to_string()).ok())
        .find(|c| c.name() == SESSION_COOKIE && !c.value().is_empty())
        .map(|c| format!("{}={}", c.name(), c.value()))
}

pub(crate) fn redirect_location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

pub(crate) fn query_param(url: &str, name: &str) -> Option<String> {
    Url::parse(url)
        .ok()?
        .query_pairs()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
}
