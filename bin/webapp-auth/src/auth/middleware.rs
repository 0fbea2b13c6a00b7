//! Authentication middleware and extractors for Axum.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use entra_samples_identity::SessionData;

use super::{AppState, found};

/// Extractor for the session established by [`with_session`](super::with_session).
///
/// Fails with a 500 when the session middleware did not run for the route.
pub struct CurrentSession(pub SessionData);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<SessionData>()
            .cloned()
            .map(CurrentSession)
            .ok_or(AuthRejection::MissingSession)
    }
}

/// Sends unauthenticated browsers to the identity provider.
///
/// The session's state token travels as the `state` parameter and is checked
/// again by the callback. Authenticated requests pass through untouched.
pub async fn require_authentication(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let session = request.extensions().get::<SessionData>();
    if session.is_some_and(SessionData::is_authenticated) {
        return next.run(request).await;
    }

    let Some(session_state) = session.and_then(SessionData::state) else {
        return AuthRejection::MissingState.into_response();
    };

    tracing::debug!(path = %request.uri().path(), "not authenticated, redirecting to provider");
    found(&state.oauth.authorization_url(session_state))
}

/// Rejection type for authentication extractors and middleware.
#[derive(Debug)]
pub enum AuthRejection {
    MissingSession,
    MissingState,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::MissingSession => {
                tracing::error!("session middleware did not run for this route");
            }
            Self::MissingState => {
                tracing::error!("session has no state token");
            }
        }
        (StatusCode::INTERNAL_SERVER_ERROR, "Session unavailable").into_response()
    }
}
