//! Router assembly and the signed-in landing page.

use axum::{Router, middleware, response::Html, routing::get};
use tower_http::trace::TraceLayer;

use crate::auth::{self, AppState, CurrentSession, routes::CALLBACK_PATH};

/// Builds the application router.
///
/// Every route except `/logout` runs inside the session middleware; `/` and
/// `/login` additionally require an authenticated session.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/", get(user_info))
        .route("/login", get(auth::login))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_authentication,
        ));

    Router::new()
        .merge(protected)
        .route(CALLBACK_PATH, get(auth::callback))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::with_session,
        ))
        .route("/logout", get(auth::logout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Greets the signed-in user.
pub async fn user_info(CurrentSession(session): CurrentSession) -> Html<String> {
    let name = session.name().unwrap_or_default();
    Html(format!("Hello {}!", handlebars::html_escape(name)))
}
