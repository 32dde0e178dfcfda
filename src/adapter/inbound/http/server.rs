//! axum server for the operational endpoints.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::metrics::MetricsExporter;
use crate::error::Result;

/// Routes for `/metrics` and `/health`.
pub fn router(exporter: Arc<MetricsExporter>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health))
        .with_state(exporter)
}

async fn metrics(State(exporter): State<Arc<MetricsExporter>>) -> Response {
    match exporter.render() {
        Ok(body) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], body).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

async fn health() -> &'static str {
    "OK"
}

/// Bind `addr` and serve until the task is dropped.
pub async fn serve(addr: SocketAddr, exporter: Arc<MetricsExporter>) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_listener(listener, exporter).await
}

/// Serve on an already bound listener.
pub async fn serve_listener(listener: TcpListener, exporter: Arc<MetricsExporter>) -> Result<()> {
    info!(addr = %listener.local_addr()?, "Metrics and health endpoint listening");
    axum::serve(listener, router(exporter)).await?;
    Ok(())
}
