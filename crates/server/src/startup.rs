use std::net::SocketAddr;

use axum::Router;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use common::{
    admin_http::{gather_default_metrics, spawn_admin_server},
    env::ensure_env,
    utils::logging::init_logging_from_env,
};
use configs::AppConfig;

use crate::{errors::StartupError, routes, state::ServerState};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Build the app and run the HTTP server until it stops.
pub async fn run() -> Result<(), StartupError> {
    dotenv().ok();
    init_logging_from_env();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    ensure_env(&cfg.invoice.output_dir).await.map_err(|e| StartupError::Runtime(e.to_string()))?;

    if let Some(addr) = cfg.server.metrics_addr.as_deref() {
        spawn_admin_server(addr, gather_default_metrics).await?;
    }

    let db = models::db::connect_with_config(&cfg.database).await?;
    let addr = bind_addr(&cfg)?;
    let state = ServerState::new(db, cfg)?;
    let app: Router = routes::build_router(state, build_cors());

    info!(%addr, "starting server");
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(anyhow::Error::from)?;
    axum::serve(listener, app).await.map_err(anyhow::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_uses_server_section() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "0.0.0.0".into();
        cfg.server.port = 9000;
        assert_eq!(bind_addr(&cfg).unwrap().to_string(), "0.0.0.0:9000");
    }

    #[test]
    fn hostname_is_rejected_as_invalid_config() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "not a host".into();
        assert!(matches!(bind_addr(&cfg), Err(StartupError::InvalidConfig(_))));
    }
}
