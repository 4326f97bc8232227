pub mod handlers;
pub mod types;

use crate::{
    Error, Result,
    config::{Config, ServerConfig},
    gradio::GradioClient,
    relay::Relay,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::post,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeFile,
    trace::TraceLayer,
};
use tracing::info;

/// Builds the HTTP surface: the landing page at `/` and the try-on relay at
/// `/tryon`, the only route open to cross-origin callers.
pub fn router(state: handlers::AppState, config: &ServerConfig) -> Result<Router> {
    let origin = config.cors_origin.parse::<HeaderValue>().map_err(|e| {
        Error::config(format!("Invalid CORS origin '{}': {}", config.cors_origin, e))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods([Method::POST])
        .allow_headers(Any);

    let landing = ServeFile::new(config.static_dir.join("index.html"));

    let body_limit = match config.max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    Ok(Router::new()
        .route_service("/", landing)
        .route("/tryon", post(handlers::tryon).layer(cors))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

pub async fn run(config: Config) -> Result<()> {
    // The remote client is created once and shared by every request
    let client = GradioClient::connect(config.remote.clone()).await?;
    let relay = Relay::new(Arc::new(client), config.server.staging_dir.clone())?;

    info!("Staging uploads in {}", relay.staging_dir().display());

    let app_state = handlers::AppState {
        relay: Arc::new(relay),
    };
    let app = router(app_state, &config.server)?;

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutting down");
}
