//! HTTP interface: the tree view, file bundling and repository updates.

mod handlers;
mod models;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::signal;

use repopick_core::SettingsManager;

pub use models::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::repo_view))
        .route("/api/tree", get(handlers::repo_view))
        .route("/read-files", post(handlers::read_files))
        .route("/update-repo", post(handlers::update_repo))
        .with_state(state)
}

pub async fn run(settings: SettingsManager, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::new(settings));
    let app = router(state);

    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!("Unable to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Received Ctrl+C, shutting down");
}
