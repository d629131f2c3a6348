//! HTTP server initialization and runtime setup.
//!
//! Builds the Notion client and forwarding service, optionally fills every
//! index, then runs the Axum server until shutdown.

use crate::application::services::ForwardingService;
use crate::config::Config;
use crate::infrastructure::notion::NotionClient;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::sync::Arc;
use std::time::Duration;

/// Builds the forwarding service backed by Notion.
///
/// # Errors
///
/// Returns an error if the Notion client cannot be constructed.
pub fn build_service(config: &Config) -> Result<ForwardingService> {
    let client = NotionClient::new(
        &config.notion_base_url,
        config.integration_token.clone(),
        Duration::from_secs(config.upstream_timeout_seconds),
    )
    .context("Failed to create Notion client")?;

    Ok(ForwardingService::new(Arc::new(client), config.databases()))
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Notion client and forwarding service
/// - Every index, unless `lazy_load` is set
/// - Axum HTTP server with graceful shutdown on Ctrl+C
///
/// # Errors
///
/// Returns an error if:
/// - Eager population fails for any database
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let service = build_service(&config)?;

    if config.lazy_load {
        tracing::info!("Lazy loading enabled, entries will be fetched on demand");
    } else {
        service
            .populate_all()
            .await
            .context("Failed to populate forwarded databases")?;
    }

    let state = AppState::new(Arc::new(service));
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen_addr))?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
