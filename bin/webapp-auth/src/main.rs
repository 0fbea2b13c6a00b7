use entra_samples_webapp_auth::{
    app,
    auth::{AppState, JwksKeys, OAuthClient, SessionStore},
    config::WebAppConfig,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration from environment
    let config = WebAppConfig::from_env().expect("failed to load configuration");
    tracing::info!(redirect_url = %config.redirect_url(), "Loaded configuration");

    let key = config.session_key().expect("invalid cookie key");
    let http_client =
        OAuthClient::http_client(config.token_timeout()).expect("failed to create HTTP client");

    let settings = config.oauth_settings();
    let keys = Arc::new(JwksKeys::new(
        settings.jwks_url().to_string(),
        http_client.clone(),
    ));
    let oauth =
        OAuthClient::new(&settings, keys, http_client).expect("failed to create OAuth client");

    let sessions = SessionStore::new(key, config.secure_cookies(), config.session_max_age());
    let app = app::router(AppState::new(oauth, sessions));

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .expect("failed to bind to address");

    tracing::info!("listening on http://{}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
