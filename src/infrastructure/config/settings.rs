//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all bot settings.
//! Configuration is loaded from a TOML file; secrets such as the Telegram
//! token and the CoinPaprika pro key only ever come from the environment.
//!
//! # Example
//!
//! ```no_run
//! use paprika_bot::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("config.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use serde::Deserialize;

use super::logging::LoggingConfig;
use super::metrics::MetricsConfig;
use super::schedule::{AlertsConfig, PriceConfig, StatsConfig};
use super::supervisor::SupervisorConfig;
use super::telegram::TelegramConfig;
use crate::adapter::outbound::coinpaprika::CoinPaprikaConfig;
use crate::error::{ConfigError, Result};

/// Environment variable holding the Telegram bot token.
pub const TELEGRAM_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Environment variable holding the optional CoinPaprika pro API key.
pub const API_PRO_KEY_ENV: &str = "API_PRO_KEY";

/// Bot configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub coinpaprika: CoinPaprikaConfig,
    #[serde(default)]
    pub price: PriceConfig,
    #[serde(default)]
    pub alerts: AlertsConfig,
    #[serde(default)]
    pub supervisor: SupervisorConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// SQLite database path.
    #[serde(default = "default_database")]
    pub database: String,
    /// CoinPaprika pro API key, read from [`API_PRO_KEY_ENV`].
    #[serde(skip)]
    pub api_pro_key: Option<String>,
    /// Telegram bot token, read from [`TELEGRAM_TOKEN_ENV`].
    #[serde(skip)]
    pub telegram_token: Option<String>,
}

fn default_database() -> String {
    "bot.db".into()
}

impl Config {
    /// Parse configuration from a TOML string.
    ///
    /// Secrets are then taken from the environment, blank values counting
    /// as unset.
    #[allow(clippy::result_large_err)]
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        config.api_pro_key = env_secret(API_PRO_KEY_ENV);
        config.telegram_token = env_secret(TELEGRAM_TOKEN_ENV);

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    #[allow(clippy::result_large_err)]
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// The Telegram token, required to run the bot.
    #[allow(clippy::result_large_err)]
    pub fn require_telegram_token(&self) -> Result<&str> {
        self.telegram_token.as_deref().ok_or_else(|| {
            ConfigError::MissingField {
                field: TELEGRAM_TOKEN_ENV,
            }
            .into()
        })
    }

    /// Validate configuration values.
    #[allow(clippy::result_large_err)]
    fn validate(&self) -> Result<()> {
        if self.coinpaprika.api_url.is_empty() {
            return Err(ConfigError::MissingField { field: "api_url" }.into());
        }
        if self.coinpaprika.pro_api_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "pro_api_url",
            }
            .into());
        }
        if self.database.is_empty() {
            return Err(ConfigError::MissingField { field: "database" }.into());
        }

        let positive = [
            ("timeout_ms", self.coinpaprika.timeout_ms),
            ("connect_timeout_ms", self.coinpaprika.connect_timeout_ms),
            ("refresh_interval_secs", self.price.refresh_interval_secs),
            ("retry_delay_secs", self.price.retry_delay_secs),
            ("check_interval_secs", self.alerts.check_interval_secs),
            ("restart_delay_ms", self.supervisor.restart_delay_ms),
            ("updates_timeout_secs", self.telegram.updates_timeout_secs),
            ("flush_interval_secs", self.stats.flush_interval_secs),
        ];
        for (field, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
        }

        if self.coinpaprika.retry_max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry_max_attempts",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        let multiplier = self.supervisor.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "backoff_multiplier",
                reason: "must be a finite number >= 1.0".to_string(),
            }
            .into());
        }
        if self.supervisor.max_restart_delay_ms < self.supervisor.restart_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "max_restart_delay_ms",
                reason: "must be >= restart_delay_ms".to_string(),
            }
            .into());
        }
        if self.telegram.search_results == 0 {
            return Err(ConfigError::InvalidValue {
                field: "search_results",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.telegram.source_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "source_url",
            }
            .into());
        }
        if self.metrics.enabled {
            if self.metrics.port == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "port",
                    reason: "must be greater than 0".to_string(),
                }
                .into());
            }
            self.metrics.socket_addr()?;
        }

        Ok(())
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

fn env_secret(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
