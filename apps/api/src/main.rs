mod auth;
mod candidates;
mod config;
mod errors;
mod matching_client;
mod routes;
mod search;
mod state;
mod upload;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::identity::IdentityProvider;
use crate::auth::session::SessionStore;
use crate::auth::StaticTokenProvider;
use crate::config::Config;
use crate::matching_client::MatchingClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting RapidRecruit v{}", env!("CARGO_PKG_VERSION"));

    let matching = MatchingClient::new(
        &config.upload_service_url,
        &config.matching_service_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;
    info!(
        "Matching client initialized (upload: {}, matching: {})",
        config.upload_service_url, config.matching_service_url
    );

    let identity = IdentityProvider::from_config(&config);
    info!("Identity provider: {}", identity.authority);

    // Static backend token until the identity provider issues access tokens
    let tokens = Arc::new(StaticTokenProvider::new(config.api_token.clone()));

    let state = AppState {
        config: config.clone(),
        matching,
        tokens,
        identity,
        sessions: SessionStore::new(Duration::from_secs(config.session_idle_secs)),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the front end has a fixed host

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
