//! Lightweight admin HTTP listener
//!
//! Exposes `/healthz` and `/metrics`, with the metrics text produced by the caller.

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

async fn healthz() -> &'static str { "OK" }

/// Build the admin router; `metrics_fn` renders the exposition text on every scrape.
pub fn admin_router(metrics_fn: fn() -> (StatusCode, String)) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(move || async move { metrics_fn() }))
}

/// Spawn the admin listener on the current tokio runtime.
pub async fn spawn_admin_server(addr: &str, metrics_fn: fn() -> (StatusCode, String)) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "admin server listening");
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, admin_router(metrics_fn)).await {
            error!(error = %e, "admin server stopped");
        }
    });
    Ok(())
}

/// Encode every metric registered in the default prometheus registry.
pub fn gather_default_metrics() -> (StatusCode, String) {
    use prometheus::{Encoder, TextEncoder};
    let mut buf = Vec::new();
    match TextEncoder::new().encode(&prometheus::gather(), &mut buf) {
        Ok(()) => (StatusCode::OK, String::from_utf8_lossy(&buf).into_owned()),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
