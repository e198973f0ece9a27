//! character-sync server entry point.
//!
//! Connects to PostgreSQL, prepares the schema, and starts the Axum HTTP
//! server.

use std::sync::Arc;

use anyhow::Context;

use character_sync::api;
use character_sync::app_state::AppState;
use character_sync::config::ServiceConfig;
use character_sync::persistence::{CharacterRepository, bootstrap};
use character_sync::service::SyncService;
use character_sync::telemetry;
use character_sync::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ServiceConfig::from_env()?;
    telemetry::init(config.log_format);
    tracing::info!(addr = %config.listen_addr, "starting character-sync");

    // Connect to the database
    let pool = match bootstrap::connect(&config.database).await {
        Ok(pool) => pool,
        Err(err) => {
            tracing::error!(error = %err, "failed to connect to database");
            std::process::exit(1);
        }
    };
    let repository = CharacterRepository::new(pool);
    repository
        .ensure_schema()
        .await
        .context("failed to create character table")?;

    // Build service layer
    let upstream = UpstreamClient::new(&config.upstream)?;
    let sync_service = Arc::new(SyncService::new(upstream, repository.clone()));

    // Build router
    let app = api::build_app(AppState { sync_service }, config.rate_limit);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.pool().close().await;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
