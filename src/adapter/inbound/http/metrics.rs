//! Prometheus view of the bot usage counters.
//!
//! Values are read from [`BotStats`] on every scrape, so the exported
//! numbers always match what gets persisted.

use std::sync::Arc;

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, IntCounter, IntCounterVec, IntGauge, Opts, Registry, TextEncoder};
use tracing::warn;

use crate::application::BotStats;
use crate::domain::StatsSnapshot;
use crate::error::{Error, Result};

const NAMESPACE: &str = "coinpaprika";
const SUBSYSTEM: &str = "telegram_bot";
const CHANNEL_LABELS: [&str; 2] = ["chat_id", "chat_name"];

fn opts(name: &str, help: &str) -> Opts {
    Opts::new(name, help).namespace(NAMESPACE).subsystem(SUBSYSTEM)
}

/// Collector that turns a [`StatsSnapshot`] into metric families.
struct StatsCollector {
    stats: Arc<BotStats>,
    descs: Vec<Desc>,
}

impl StatsCollector {
    fn new(stats: Arc<BotStats>) -> Result<Self> {
        let empty = Self::families(&StatsSnapshot::default())?;
        let descs = empty
            .iter()
            .flat_map(|c| c.desc().into_iter().cloned().collect::<Vec<_>>())
            .collect();
        Ok(Self { stats, descs })
    }

    fn families(snapshot: &StatsSnapshot) -> Result<Vec<Box<dyn Collector>>> {
        let commands = IntCounter::with_opts(opts(
            "commands_processed",
            "The total number of processed commands",
        ))?;
        commands.inc_by(snapshot.commands_processed);

        let messages = IntCounter::with_opts(opts(
            "messages_handled",
            "The total number of handled messages",
        ))?;
        messages.inc_by(snapshot.messages_handled);

        let channels = IntGauge::with_opts(opts(
            "channels_count",
            "The current number of unique channels the bot is operating in",
        ))?;
        channels.set(i64::try_from(snapshot.channel_count()).unwrap_or(i64::MAX));

        let names = IntCounterVec::new(
            opts("channel_names", "Tracks channels the bot has interacted with"),
            &CHANNEL_LABELS,
        )?;
        let per_channel = IntCounterVec::new(
            opts(
                "messages_per_channel",
                "The total number of messages handled per channel",
            ),
            &CHANNEL_LABELS,
        )?;

        for (chat_id, name) in &snapshot.channels {
            let id = chat_id.to_string();
            names.with_label_values(&[id.as_str(), name.as_str()]).inc();
        }
        for (chat_id, count) in &snapshot.messages_per_channel {
            let id = chat_id.to_string();
            let name = snapshot
                .channels
                .get(chat_id)
                .cloned()
                .unwrap_or_else(|| StatsSnapshot::channel_name(*chat_id, None));
            per_channel
                .with_label_values(&[id.as_str(), name.as_str()])
                .inc_by(*count);
        }

        Ok(vec![
            Box::new(commands),
            Box::new(messages),
            Box::new(channels),
            Box::new(names),
            Box::new(per_channel),
        ])
    }
}

impl Collector for StatsCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        match Self::families(&self.stats.snapshot()) {
            Ok(collectors) => collectors.iter().flat_map(|c| c.collect()).collect(),
            Err(e) => {
                warn!(error = %e, "Failed to collect bot metrics");
                Vec::new()
            }
        }
    }
}

/// Registry holding the bot metrics, rendered in the text exposition format.
pub struct MetricsExporter {
    registry: Registry,
}

impl MetricsExporter {
    /// Register the usage counters of `stats`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Metrics`] if the metric definitions are rejected.
    pub fn new(stats: Arc<BotStats>) -> Result<Self> {
        let registry = Registry::new();
        registry.register(Box::new(StatsCollector::new(stats)?))?;
        Ok(Self { registry })
    }

    /// Current metrics as Prometheus text.
    pub fn render(&self) -> Result<String> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| Error::Parse(e.to_string()))
    }
}
