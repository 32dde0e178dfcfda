//! Telegram delivery of triggered alerts.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tracing::debug;

use super::format::format_alert_message;
use crate::domain::TriggeredAlert;
use crate::error::Result;
use crate::port::Notifier;

/// Sends alert notifications through the bot API.
///
/// The chat to notify is taken from each alert, so one notifier serves
/// every chat.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    #[must_use]
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, alert: &TriggeredAlert) -> Result<()> {
        let text = format_alert_message(alert);
        self.bot
            .send_message(ChatId(alert.chat_id()), text)
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
        debug!(chat_id = alert.chat_id(), alert_id = %alert.alert.id, "Telegram alert delivered");
        Ok(())
    }
}
