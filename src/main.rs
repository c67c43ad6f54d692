//! Publisher server entry point.
//!
//! Starts the Axum server with the WebSocket relay endpoint and system
//! endpoints.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use pubsub_publisher::api;
use pubsub_publisher::app_state::AppState;
use pubsub_publisher::config::PublisherConfig;
use pubsub_publisher::domain::ConnectionRegistry;
use pubsub_publisher::error::PublisherError;
use pubsub_publisher::service::RelayService;
use pubsub_publisher::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = PublisherConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting publisher");

    // Build the relay
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = Arc::new(RelayService::new(registry));

    // Build application state
    let app_state = AppState {
        relay,
        config: config.clone(),
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .map_err(PublisherError::Bind)?;
    tracing::info!(addr = %config.listen_addr, "publisher listening");

    axum::serve(listener, app).await?;

    Ok(())
}
