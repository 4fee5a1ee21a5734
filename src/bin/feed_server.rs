//! pointcloud-feed server entry point.
//!
//! Starts the Axum server with the WebSocket feed at `/` and the REST
//! endpoints used to publish frames.

use pointcloud_feed::api;
use pointcloud_feed::app_state::AppState;
use pointcloud_feed::config::ServerConfig;
use pointcloud_feed::domain::FrameBus;
use pointcloud_feed::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    telemetry::init(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting pointcloud-feed server");

    // Build application state
    let app_state = AppState::new(FrameBus::new(config.frame_bus_capacity));

    // Build router
    let app = api::build_app(app_state, &config);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
