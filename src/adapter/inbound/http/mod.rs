//! Operational HTTP endpoints: Prometheus `/metrics` and `/health`.

pub mod metrics;
pub mod server;

pub use metrics::MetricsExporter;
pub use server::{router, serve, serve_listener};
