//! CoinPaprika client configuration.

use serde::Deserialize;

/// CoinPaprika REST API settings.
///
/// The API key is never read from here; it comes from the environment and
/// selects `pro_api_url` when present.
#[derive(Debug, Clone, Deserialize)]
pub struct CoinPaprikaConfig {
    /// Public API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Pro API base URL, used when an API key is configured.
    #[serde(default = "default_pro_api_url")]
    pub pro_api_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Attempts per request for timeouts and connection failures.
    #[serde(default = "default_retry_max_attempts")]
    pub retry_max_attempts: u32,
    /// Backoff between retries in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_api_url() -> String {
    "https://api.coinpaprika.com/v1".into()
}

fn default_pro_api_url() -> String {
    "https://api-pro.coinpaprika.com/v1".into()
}

const fn default_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

const fn default_retry_max_attempts() -> u32 {
    2
}

const fn default_retry_backoff_ms() -> u64 {
    500
}

impl Default for CoinPaprikaConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            pro_api_url: default_pro_api_url(),
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_max_attempts: default_retry_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}
