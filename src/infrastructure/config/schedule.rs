//! Polling schedules for the background loops.

use std::time::Duration;

use serde::Deserialize;

use crate::application::PriceUpdaterConfig;
use crate::domain::DeliveryPolicy;

/// Price cache refresh schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceConfig {
    /// Seconds between successful refreshes.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Seconds to wait after a failed refresh.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
}

const fn default_refresh_interval_secs() -> u64 {
    30
}

const fn default_retry_delay_secs() -> u64 {
    30
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            retry_delay_secs: default_retry_delay_secs(),
        }
    }
}

impl PriceConfig {
    #[must_use]
    pub fn to_updater_config(&self) -> PriceUpdaterConfig {
        PriceUpdaterConfig {
            refresh_interval: Duration::from_secs(self.refresh_interval_secs),
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }
}

/// Alert evaluation schedule and delivery guarantee.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,
    #[serde(default)]
    pub delivery: DeliveryPolicy,
}

const fn default_check_interval_secs() -> u64 {
    60
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval_secs(),
            delivery: DeliveryPolicy::default(),
        }
    }
}

impl AlertsConfig {
    #[must_use]
    pub const fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }
}

/// Statistics persistence schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Seconds between metric flushes (default: 300).
    #[serde(default = "default_flush_interval_secs")]
    pub flush_interval_secs: u64,
}

const fn default_flush_interval_secs() -> u64 {
    300
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            flush_interval_secs: default_flush_interval_secs(),
        }
    }
}

impl StatsConfig {
    #[must_use]
    pub const fn flush_interval(&self) -> Duration {
        Duration::from_secs(self.flush_interval_secs)
    }
}
