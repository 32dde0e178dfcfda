//! Chat command handling, independent of the Telegram transport.

use std::sync::Arc;

use tracing::{debug, error};

use crate::application::AlertService;
use crate::domain::{AlertTarget, Coin, InstrumentId, TickerDetails};
use crate::error::{Error, Result};
use crate::port::CoinLookup;

use super::command::{parse_coin_link, ChatCommand};
use super::render;

/// Telegram rejects callback data longer than this many bytes.
const CALLBACK_DATA_LIMIT: usize = 64;

const ALERT_SELECT_PREFIX: &str = "alert_select";

/// One button of the alert coin picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertChoice {
    pub label: String,
    pub data: String,
}

/// What to send back for a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A MarkdownV2 message.
    Text(String),
    /// A MarkdownV2 message with one inline button per choice.
    Choices { text: String, choices: Vec<AlertChoice> },
}

/// Result of pressing an alert picker button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackReply {
    /// Short toast shown on the pressed button.
    pub toast: &'static str,
    /// MarkdownV2 message sent to the chat, if any.
    pub message: Option<String>,
    /// Whether the picker message should be removed.
    pub remove_picker: bool,
}

/// Settings for [`CommandHandler`].
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Maximum coins offered in the alert picker.
    pub search_results: usize,
    /// Link returned by `/source`.
    pub source_url: String,
}

/// Turns parsed commands into replies.
#[derive(Clone)]
pub struct CommandHandler {
    lookup: Arc<dyn CoinLookup>,
    alerts: AlertService,
    config: HandlerConfig,
}

impl CommandHandler {
    pub fn new(lookup: Arc<dyn CoinLookup>, alerts: AlertService, config: HandlerConfig) -> Self {
        Self {
            lookup,
            alerts,
            config,
        }
    }

    /// Answer a command from `chat_id`.
    ///
    /// Provider and storage failures are logged and turned into a generic
    /// apology; alert validation errors are explained to the user.
    pub async fn handle(&self, chat_id: i64, command: ChatCommand) -> Reply {
        let result = match command {
            ChatCommand::Start | ChatCommand::Help => Ok(Reply::Text(render::help())),
            ChatCommand::Source => Ok(Reply::Text(render::source(&self.config.source_url))),
            ChatCommand::Price(query) => self.lookup_reply(&query, price_reply).await,
            ChatCommand::Supply(query) => self.lookup_reply(&query, supply_reply).await,
            ChatCommand::Volume(query) => self.lookup_reply(&query, volume_reply).await,
            ChatCommand::Overview(query) => self.lookup_reply(&query, overview_reply).await,
            ChatCommand::Alert { coin, target } => self.alert(chat_id, &coin, &target).await,
            ChatCommand::AlertList => self.alert_list(chat_id).await,
        };

        result.unwrap_or_else(|e| Reply::Text(render_error(&e)))
    }

    /// Handle an inline button press from `chat_id`.
    pub async fn handle_callback(&self, chat_id: i64, data: &str) -> CallbackReply {
        let Some((instrument, target)) = parse_alert_select(data) else {
            debug!(data, "Unknown callback data");
            return CallbackReply {
                toast: "Unknown action. Please try again.",
                message: None,
                remove_picker: false,
            };
        };

        match self.create_alert(chat_id, &instrument, &target).await {
            Ok(text) => CallbackReply {
                toast: "Alert saved.",
                message: Some(text),
                remove_picker: true,
            },
            Err(e) => CallbackReply {
                toast: "Failed to save alert.",
                message: Some(render_error(&e)),
                remove_picker: true,
            },
        }
    }

    /// Search for `query`, fetch the best match's ticker and render it.
    async fn lookup_reply<F>(&self, query: &str, render_fn: F) -> Result<Reply>
    where
        F: Fn(&Coin, TickerDetails) -> String,
    {
        let Some(coin) = self.lookup.search(query).await?.into_iter().next() else {
            return Ok(Reply::Text(render::coin_not_found(query)));
        };
        debug!(query, instrument = %coin.id, "Best match");

        let text = match self.lookup.ticker(&coin.id).await? {
            Some(details) => render_fn(&coin, details),
            None => render::coin_not_traded(&coin),
        };
        Ok(Reply::Text(text))
    }

    async fn alert(&self, chat_id: i64, coin: &str, target: &str) -> Result<Reply> {
        AlertTarget::parse(target)?;

        if let Some(instrument) = parse_coin_link(coin) {
            let text = self.create_alert(chat_id, &instrument, target).await?;
            return Ok(Reply::Text(text));
        }

        let coins = self.lookup.search(coin).await?;
        let cache = self.alerts.cache().snapshot();
        let choices: Vec<AlertChoice> = coins
            .into_iter()
            .filter(|c| cache.get(&c.id).is_some())
            .filter_map(|c| {
                let data = alert_select_data(&c.id, target);
                if data.len() > CALLBACK_DATA_LIMIT {
                    debug!(instrument = %c.id, "Callback data too long, skipping coin");
                    return None;
                }
                Some(AlertChoice {
                    label: format!("{} ({})", c.name, c.symbol),
                    data,
                })
            })
            .take(self.config.search_results)
            .collect();

        if choices.is_empty() {
            return Ok(Reply::Text(render::no_alert_choices(coin)));
        }
        Ok(Reply::Choices {
            text: render::alert_choices(choices.len(), coin),
            choices,
        })
    }

    async fn create_alert(&self, chat_id: i64, instrument: &InstrumentId, target: &str) -> Result<String> {
        let alert = self.alerts.create(chat_id, instrument, target).await?;
        let (name, symbol) = self
            .alerts
            .cache()
            .get(instrument)
            .map(|q| (q.name, q.symbol))
            .unwrap_or_else(|| (instrument.to_string(), String::new()));
        Ok(render::alert_created(&alert, &name, &symbol))
    }

    async fn alert_list(&self, chat_id: i64) -> Result<Reply> {
        let alerts = self.alerts.list(chat_id).await?;
        let snapshot = self.alerts.cache().snapshot();
        let text = render::alert_list(&alerts, |a| {
            snapshot
                .get(&a.instrument)
                .map(|q| (q.name.clone(), q.symbol.clone()))
        });
        Ok(Reply::Text(text))
    }
}

fn price_reply(coin: &Coin, details: TickerDetails) -> String {
    match (details.price_usd, details.price_btc) {
        (Some(usd), Some(btc)) => render::price(&details, usd, btc),
        _ => render::coin_not_traded(coin),
    }
}

fn supply_reply(coin: &Coin, details: TickerDetails) -> String {
    match details.circulating_supply {
        Some(circulating) => render::supply(&details, circulating),
        None => render::coin_not_traded(coin),
    }
}

fn volume_reply(coin: &Coin, details: TickerDetails) -> String {
    match details.volume_24h_usd {
        Some(volume) => render::volume(&details, volume),
        None => render::coin_not_traded(coin),
    }
}

fn overview_reply(coin: &Coin, details: TickerDetails) -> String {
    if details.is_traded() {
        render::overview(&details)
    } else {
        render::coin_not_traded(coin)
    }
}

fn render_error(err: &Error) -> String {
    match err {
        Error::Alert(alert) => render::alert_error(alert),
        other => {
            error!(error = %other, "Command failed");
            render::failure()
        }
    }
}

/// Callback data for picking `instrument` with `target`.
pub fn alert_select_data(instrument: &InstrumentId, target: &str) -> String {
    format!("{ALERT_SELECT_PREFIX}|{instrument}|{target}")
}

/// Inverse of [`alert_select_data`].
pub fn parse_alert_select(data: &str) -> Option<(InstrumentId, String)> {
    let mut parts = data.splitn(3, '|');
    if parts.next()? != ALERT_SELECT_PREFIX {
        return None;
    }
    let instrument = parts.next().filter(|s| !s.is_empty())?;
    let target = parts.next().filter(|s| !s.is_empty())?;
    Some((InstrumentId::from(instrument), target.to_string()))
}
