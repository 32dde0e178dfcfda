//! In-memory usage counters with periodic persistence.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::StatsSnapshot;
use crate::error::Result;
use crate::port::MetricStore;

/// Usage counters shared by every chat handler.
#[derive(Debug, Default)]
pub struct BotStats {
    inner: Mutex<StatsSnapshot>,
}

impl BotStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously saved counters.
    #[must_use]
    pub fn restore(snapshot: StatsSnapshot) -> Self {
        Self {
            inner: Mutex::new(snapshot),
        }
    }

    /// Count an inbound command message from `chat_id`.
    ///
    /// A chat keeps the display name it had when first seen.
    pub fn record_message(&self, chat_id: i64, title: Option<&str>) {
        let mut stats = self.inner.lock();
        stats.messages_handled += 1;
        *stats.messages_per_channel.entry(chat_id).or_default() += 1;
        stats
            .channels
            .entry(chat_id)
            .or_insert_with(|| StatsSnapshot::channel_name(chat_id, title));
    }

    /// Count a command that was answered.
    pub fn record_command(&self) {
        self.inner.lock().commands_processed += 1;
    }

    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        self.inner.lock().clone()
    }

    /// Write the current counters to `store`.
    pub async fn flush(&self, store: &dyn MetricStore) -> Result<()> {
        let snapshot = self.snapshot();
        store.save(&snapshot).await?;
        debug!(
            commands = snapshot.commands_processed,
            messages = snapshot.messages_handled,
            channels = snapshot.channel_count(),
            "Stats flushed"
        );
        Ok(())
    }
}

/// Flush `stats` to `store` every `interval` forever.
pub async fn run_flusher(stats: Arc<BotStats>, store: Arc<dyn MetricStore>, interval: Duration) -> Result<()> {
    info!(interval_secs = interval.as_secs(), "Stats flusher started");

    let mut ticker = tokio::time::interval(interval);
    // First tick completes immediately; nothing new to save yet.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        if let Err(e) = stats.flush(store.as_ref()).await {
            warn!(error = %e, "Failed to flush stats");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_message_keeps_first_channel_name() {
        let stats = BotStats::new();
        stats.record_message(1, Some("Traders"));
        stats.record_message(1, Some("Traders Renamed"));
        stats.record_message(2, None);
        stats.record_command();

        let snap = stats.snapshot();
        assert_eq!(snap.messages_handled, 3);
        assert_eq!(snap.commands_processed, 1);
        assert_eq!(snap.channel_count(), 2);
        assert_eq!(snap.channels[&1], "Traders");
        assert_eq!(snap.channels[&2], "PrivateChat-2");
        assert_eq!(snap.messages_per_channel[&1], 2);
    }

    #[test]
    fn restore_continues_from_saved_counters() {
        let saved = StatsSnapshot {
            commands_processed: 10,
            messages_handled: 12,
            ..StatsSnapshot::default()
        };

        let stats = BotStats::restore(saved);
        stats.record_command();
        stats.record_message(7, None);

        let snap = stats.snapshot();
        assert_eq!(snap.commands_processed, 11);
        assert_eq!(snap.messages_handled, 13);
    }
}
