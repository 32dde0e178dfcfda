//! Restart policy for supervised background tasks.

use std::time::Duration;

use serde::Deserialize;

use crate::application::RestartPolicy;

/// Backoff between relaunches of a failed background task.
#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorConfig {
    /// Delay before the first relaunch (milliseconds).
    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,
    /// Maximum delay between relaunches (milliseconds).
    #[serde(default = "default_max_restart_delay_ms")]
    pub max_restart_delay_ms: u64,
    /// Multiplier applied to the delay after each consecutive failure.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
    /// Consecutive failures logged at error level before switching to debug.
    #[serde(default = "default_log_failure_limit")]
    pub log_failure_limit: u32,
}

const fn default_restart_delay_ms() -> u64 {
    10_000 // 10 seconds
}

const fn default_max_restart_delay_ms() -> u64 {
    60_000 // 60 seconds
}

const fn default_backoff_multiplier() -> f64 {
    2.0
}

const fn default_log_failure_limit() -> u32 {
    5
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            restart_delay_ms: default_restart_delay_ms(),
            max_restart_delay_ms: default_max_restart_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
            log_failure_limit: default_log_failure_limit(),
        }
    }
}

impl SupervisorConfig {
    #[must_use]
    pub fn to_policy(&self) -> RestartPolicy {
        RestartPolicy {
            initial_delay: Duration::from_millis(self.restart_delay_ms),
            max_delay: Duration::from_millis(self.max_restart_delay_ms),
            multiplier: self.backoff_multiplier,
            log_failure_limit: self.log_failure_limit,
        }
    }
}
