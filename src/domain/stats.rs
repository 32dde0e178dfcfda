//! Usage counters for the bot.

use std::collections::BTreeMap;

/// Point-in-time copy of the usage counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Commands answered successfully.
    pub commands_processed: u64,
    /// Inbound command messages, answered or not.
    pub messages_handled: u64,
    /// Chats seen so far, keyed by chat id.
    pub channels: BTreeMap<i64, String>,
    /// Inbound command messages per chat.
    pub messages_per_channel: BTreeMap<i64, u64>,
}

impl StatsSnapshot {
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Display name for a chat, falling back to `PrivateChat-<id>`.
    #[must_use]
    pub fn channel_name(chat_id: i64, title: Option<&str>) -> String {
        match title {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("PrivateChat-{chat_id}"),
        }
    }
}
