//! HTTP surface: `/metrics`, `/pcie-tree` and `/healthz`.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use super::metrics::{self, scrape_metrics, ScrapeCounters};
use super::tree::{self, scrape_tree};
use crate::core::config::ExporterConfig;
use crate::error::{PcieError, Result};

/// Shared handler state. Each request performs its own filesystem walk.
#[derive(Debug, Clone)]
pub struct AppState {
    pub sysfs_root: Arc<PathBuf>,
    pub counters: Arc<ScrapeCounters>,
}

impl AppState {
    pub fn new(sysfs_root: PathBuf) -> Self {
        Self {
            sysfs_root: Arc::new(sysfs_root),
            counters: Arc::new(ScrapeCounters::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/pcie-tree", get(tree_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(state)
}

/// Always 200; scrape failures are reported inside the page.
pub async fn metrics_handler(State(state): State<AppState>) -> Response {
    let scrape = tokio::task::spawn_blocking(move || {
        scrape_metrics(&state.sysfs_root, &state.counters)
    });

    match scrape.await {
        Ok(body) => ([(header::CONTENT_TYPE, metrics::CONTENT_TYPE)], body).into_response(),
        Err(e) => {
            log::error!("metrics scrape task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn tree_handler(State(state): State<AppState>) -> Response {
    let scrape = tokio::task::spawn_blocking(move || scrape_tree(&state.sysfs_root));

    match scrape.await {
        Ok(doc) => {
            let status = if doc.is_error() {
                StatusCode::INTERNAL_SERVER_ERROR
            } else {
                StatusCode::OK
            };
            (status, [(header::CONTENT_TYPE, tree::CONTENT_TYPE)], doc.into_body()).into_response()
        }
        Err(e) => {
            log::error!("topology scrape task failed: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

pub async fn healthz_handler() -> &'static str {
    "ok\n"
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &ExporterConfig) -> Result<()> {
    let addr = config.socket_addr().await?;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| PcieError::server(format!("bind {}: {}", addr, e)))?;

    log::info!(
        "starting pcie-exporter on {} with sysfs root {}",
        addr,
        config.sysfs_root.display()
    );

    let app = router(AppState::new(config.sysfs_root.clone()));
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PcieError::server(format!("serve on {}: {}", addr, e)))?;

    log::info!("pcie-exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("shutdown signal received");
}
