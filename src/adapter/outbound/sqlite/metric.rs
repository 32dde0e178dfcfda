//! SQLite metric store implementation.
//!
//! Counters are stored as `(metric_name, label_key, label_value) -> value`
//! rows. Per-chat rows use the chat id as `label_key`; the channel name
//! rows additionally carry the chat title in `label_value`.

use async_trait::async_trait;
use diesel::prelude::*;
use tracing::warn;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::MetricRow;
use crate::adapter::outbound::sqlite::database::schema::metrics;
use crate::domain::StatsSnapshot;
use crate::error::Result;
use crate::port::MetricStore;

const COMMANDS_PROCESSED: &str = "commands_processed";
const MESSAGES_HANDLED: &str = "messages_handled";
const CHANNELS_COUNT: &str = "channels_count";
const CHANNEL_NAMES: &str = "channel_names";
const MESSAGES_PER_CHANNEL: &str = "messages_per_channel";

/// SQLite-backed metric store.
pub struct SqliteMetricStore {
    pool: DbPool,
}

impl SqliteMetricStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn unlabeled(name: &str, value: f64) -> MetricRow {
        MetricRow {
            metric_name: name.to_string(),
            label_key: String::new(),
            label_value: String::new(),
            metric_value: value,
        }
    }

    fn to_rows(snapshot: &StatsSnapshot) -> Vec<MetricRow> {
        let mut rows = vec![
            Self::unlabeled(COMMANDS_PROCESSED, snapshot.commands_processed as f64),
            Self::unlabeled(MESSAGES_HANDLED, snapshot.messages_handled as f64),
            Self::unlabeled(CHANNELS_COUNT, snapshot.channel_count() as f64),
        ];

        rows.extend(snapshot.channels.iter().map(|(chat_id, name)| MetricRow {
            metric_name: CHANNEL_NAMES.to_string(),
            label_key: chat_id.to_string(),
            label_value: name.clone(),
            metric_value: *chat_id as f64,
        }));

        rows.extend(
            snapshot
                .messages_per_channel
                .iter()
                .map(|(chat_id, count)| MetricRow {
                    metric_name: MESSAGES_PER_CHANNEL.to_string(),
                    label_key: chat_id.to_string(),
                    label_value: String::new(),
                    metric_value: *count as f64,
                }),
        );

        rows
    }

    fn from_rows(rows: Vec<MetricRow>) -> StatsSnapshot {
        let mut snapshot = StatsSnapshot::default();

        for row in rows {
            match row.metric_name.as_str() {
                COMMANDS_PROCESSED => snapshot.commands_processed = counter(row.metric_value),
                MESSAGES_HANDLED => snapshot.messages_handled = counter(row.metric_value),
                // Derived from the channel rows.
                CHANNELS_COUNT => {}
                CHANNEL_NAMES | MESSAGES_PER_CHANNEL => {
                    let Ok(chat_id) = row.label_key.parse::<i64>() else {
                        warn!(
                            metric = %row.metric_name,
                            label = %row.label_key,
                            "Skipping metric row with invalid chat id"
                        );
                        continue;
                    };
                    if row.metric_name == CHANNEL_NAMES {
                        snapshot.channels.insert(chat_id, row.label_value);
                    } else {
                        snapshot
                            .messages_per_channel
                            .insert(chat_id, counter(row.metric_value));
                    }
                }
                other => warn!(metric = other, "Skipping unknown metric row"),
            }
        }

        snapshot
    }
}

fn counter(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

#[async_trait]
impl MetricStore for SqliteMetricStore {
    async fn load(&self) -> Result<StatsSnapshot> {
        let mut conn = self.pool.get()?;

        let rows: Vec<MetricRow> = metrics::table
            .select(MetricRow::as_select())
            .load(&mut conn)?;

        Ok(Self::from_rows(rows))
    }

    async fn save(&self, snapshot: &StatsSnapshot) -> Result<()> {
        let rows = Self::to_rows(snapshot);
        let mut conn = self.pool.get()?;

        conn.transaction(|conn| {
            // Per-chat rows are rewritten in full so renamed chats leave no stale rows.
            diesel::delete(metrics::table.filter(metrics::label_key.ne(""))).execute(conn)?;
            for row in &rows {
                diesel::replace_into(metrics::table).values(row).execute(conn)?;
            }
            diesel::QueryResult::Ok(())
        })?;

        Ok(())
    }
}
