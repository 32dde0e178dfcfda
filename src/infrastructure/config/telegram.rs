//! Telegram chat configuration.

use std::time::Duration;

use serde::Deserialize;

use crate::adapter::inbound::telegram::HandlerConfig;

/// Telegram chat configuration.
///
/// The bot token is read from `TELEGRAM_BOT_TOKEN`, never from the file.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Long-polling timeout in seconds (default: 60).
    #[serde(default = "default_updates_timeout_secs")]
    pub updates_timeout_secs: u64,
    /// Coins offered by the `/alert` picker (default: 4).
    #[serde(default = "default_search_results")]
    pub search_results: usize,
    /// Link answered by `/source`.
    #[serde(default = "default_source_url")]
    pub source_url: String,
}

const fn default_updates_timeout_secs() -> u64 {
    60
}

const fn default_search_results() -> usize {
    4
}

fn default_source_url() -> String {
    "https://github.com/coinpaprika/telegram-bot-v2".into()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            updates_timeout_secs: default_updates_timeout_secs(),
            search_results: default_search_results(),
            source_url: default_source_url(),
        }
    }
}

impl TelegramConfig {
    #[must_use]
    pub const fn updates_timeout(&self) -> Duration {
        Duration::from_secs(self.updates_timeout_secs)
    }

    #[must_use]
    pub fn handler_config(&self) -> HandlerConfig {
        HandlerConfig {
            search_results: self.search_results,
            source_url: self.source_url.clone(),
        }
    }
}
