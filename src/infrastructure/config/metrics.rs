//! Prometheus metrics and health endpoint.

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Where `/metrics` and `/health` are served.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Serve the endpoint at all (default: true).
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Interface to bind (default: all interfaces).
    #[serde(default = "default_bind")]
    pub bind: String,
    /// TCP port (default: 9090).
    #[serde(default = "default_port")]
    pub port: u16,
}

const fn default_enabled() -> bool {
    true
}

fn default_bind() -> String {
    "0.0.0.0".into()
}

const fn default_port() -> u16 {
    9090
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl MetricsConfig {
    /// Socket address to listen on.
    #[allow(clippy::result_large_err)]
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self.bind.trim().parse().map_err(|_| ConfigError::InvalidValue {
            field: "bind",
            reason: format!("`{}` is not an IP address", self.bind),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
