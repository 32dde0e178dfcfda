//! Price cache refresh loop.
//!
//! # Architecture
//!
//! ```text
//! TickerFeed --fetch_tickers()--> PriceUpdater --replace()--> PriceCache
//!                                      |
//!                                      +-- failure: keep snapshot, retry later
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::application::cache::PriceCache;
use crate::error::Result;
use crate::port::TickerFeed;

/// Timing for the refresh loop.
#[derive(Debug, Clone)]
pub struct PriceUpdaterConfig {
    /// Pause after a successful refresh.
    pub refresh_interval: Duration,
    /// Pause after a failed refresh.
    pub retry_delay: Duration,
}

impl Default for PriceUpdaterConfig {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(30),
            retry_delay: Duration::from_secs(30),
        }
    }
}

/// Sole writer of the [`PriceCache`].
#[derive(Clone)]
pub struct PriceUpdater {
    feed: Arc<dyn TickerFeed>,
    cache: Arc<PriceCache>,
    config: PriceUpdaterConfig,
}

impl PriceUpdater {
    pub fn new(feed: Arc<dyn TickerFeed>, cache: Arc<PriceCache>, config: PriceUpdaterConfig) -> Self {
        Self { feed, cache, config }
    }

    /// Fetch every ticker and swap the cache to the result.
    ///
    /// On error the cache is left exactly as it was. Returns the number of
    /// instruments in the new snapshot.
    pub async fn refresh(&self) -> Result<usize> {
        let entries = self.feed.fetch_tickers().await?;
        let count = self.cache.replace(entries);
        debug!(instruments = count, "Price cache refreshed");
        Ok(count)
    }

    /// Refresh forever.
    ///
    /// Fetch failures are logged and retried after `retry_delay`; they never
    /// end the loop.
    pub async fn run(self) -> Result<()> {
        info!(
            interval_secs = self.config.refresh_interval.as_secs(),
            "Price updater started"
        );

        loop {
            let pause = match self.refresh().await {
                Ok(_) => self.config.refresh_interval,
                Err(e) => {
                    warn!(
                        error = %e,
                        cached = self.cache.len(),
                        retry_secs = self.config.retry_delay.as_secs(),
                        "Price refresh failed, keeping previous snapshot"
                    );
                    self.config.retry_delay
                }
            };
            tokio::time::sleep(pause).await;
        }
    }
}
