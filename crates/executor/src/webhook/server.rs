use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use common::config::ServerConfig;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::webhook::handlers::{self, AlertHandler, RelayHandler};

pub fn trading_router(handler: Arc<AlertHandler>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/webhook", post(handlers::alert_webhook))
        .with_state(handler)
        .layer(TraceLayer::new_for_http())
}

pub fn relay_router(handler: Arc<RelayHandler>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/webhook", post(handlers::relay_webhook))
        .with_state(handler)
        .layer(TraceLayer::new_for_http())
}

/// Binds the configured host and port. Hostnames are resolved.
pub async fn bind(server: &ServerConfig) -> anyhow::Result<TcpListener> {
    TcpListener::bind(server.bind_target())
        .await
        .with_context(|| format!("Failed to bind to {}:{}", server.host, server.port))
}

/// Serves `app` until Ctrl-C.
pub async fn serve(app: Router, server: &ServerConfig) -> anyhow::Result<()> {
    let listener = bind(server).await?;
    let addr = listener.local_addr().context("Listener has no local address")?;

    info!("Webhook server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Webhook server error")?;

    info!("Webhook server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
