//! HTTP surface: a single `GET /{date}/{currency}` route.

pub mod error;
pub mod handlers;

use crate::source::RateSource;
use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<RateSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/:date/:currency", get(handlers::get_rate))
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `address` and serves until Ctrl-C.
///
/// The rate table is loaded in the background while the listener already
/// accepts requests. Lookups arriving meanwhile wait for that load. A failed
/// load does not stop the server; lookups answer with a 500 until the source
/// becomes reachable.
pub async fn serve(address: &str, source: Arc<RateSource>) -> Result<()> {
    let listener = TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;
    serve_on(listener, source).await
}

pub async fn serve_on(listener: TcpListener, source: Arc<RateSource>) -> Result<()> {
    info!("Listening on http://{}", listener.local_addr()?);

    let warm = Arc::clone(&source);
    tokio::spawn(async move { warm.warm_up().await });

    axum::serve(listener, router(AppState { source }))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
