//! Teloxide dispatcher wiring for messages and inline-keyboard callbacks.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::types::{BotCommand, InlineKeyboardButton, InlineKeyboardMarkup, ParseMode};
use teloxide::update_listeners::Polling;
use tracing::{debug, error, info, warn};

use crate::application::BotStats;

use super::command::{bot_commands, parse_command, ChatCommand, CommandParseError};
use super::handler::{CommandHandler, Reply};
use super::render;

/// Shared state for the update endpoints.
pub struct BotContext {
    pub handler: CommandHandler,
    pub stats: Arc<BotStats>,
}

/// Poll for updates until `shutdown` resolves.
///
/// Registers the command menu first; a failure there is logged and does not
/// stop the bot.
pub async fn run_dispatcher<S>(bot: Bot, context: Arc<BotContext>, updates_timeout: Duration, shutdown: S)
where
    S: Future<Output = ()> + Send + 'static,
{
    if let Err(e) = register_bot_commands(&bot).await {
        warn!(error = %e, "Failed to register bot commands with Telegram");
    }

    let schema = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    let mut dispatcher = Dispatcher::builder(bot.clone(), schema)
        .dependencies(dptree::deps![context])
        .default_handler(|_| async {})
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        shutdown.await;
        info!("Stopping Telegram dispatcher");
        match token.shutdown() {
            Ok(done) => done.await,
            Err(e) => warn!(error = %e, "Dispatcher was not running at shutdown"),
        }
    });

    let listener = Polling::builder(bot)
        .timeout(updates_timeout)
        .delete_webhook()
        .await
        .build();

    info!(timeout_secs = updates_timeout.as_secs(), "Telegram dispatcher started");
    dispatcher
        .dispatch_with_listener(
            listener,
            LoggingErrorHandler::with_custom_text("Telegram update listener error"),
        )
        .await;
    info!("Telegram dispatcher stopped");
}

async fn on_message(bot: Bot, msg: Message, context: Arc<BotContext>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let reply = match parse_command(text) {
        Ok(command) => {
            context.stats.record_message(msg.chat.id.0, msg.chat.title());
            debug!(chat_id = msg.chat.id.0, ?command, "Command received");
            context.handler.handle(msg.chat.id.0, command).await
        }
        Err(CommandParseError::NotACommand) => return Ok(()),
        Err(CommandParseError::UnknownCommand(cmd)) => {
            context.stats.record_message(msg.chat.id.0, msg.chat.title());
            debug!(chat_id = msg.chat.id.0, command = %cmd, "Unknown command");
            context.handler.handle(msg.chat.id.0, ChatCommand::Help).await
        }
        Err(CommandParseError::MissingArgument { command, argument }) => {
            context.stats.record_message(msg.chat.id.0, msg.chat.title());
            Reply::Text(render::usage(command, argument))
        }
    };

    send_reply(&bot, msg.chat.id, reply).await?;
    context.stats.record_command();
    Ok(())
}

async fn send_reply(bot: &Bot, chat_id: ChatId, reply: Reply) -> ResponseResult<()> {
    match reply {
        Reply::Text(text) => {
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::MarkdownV2)
                .await?;
        }
        Reply::Choices { text, choices } => {
            let keyboard = InlineKeyboardMarkup::new(
                choices
                    .into_iter()
                    .map(|c| vec![InlineKeyboardButton::callback(c.label, c.data)]),
            );
            bot.send_message(chat_id, text)
                .parse_mode(ParseMode::MarkdownV2)
                .reply_markup(keyboard)
                .await?;
        }
    }
    Ok(())
}

async fn on_callback(bot: Bot, q: CallbackQuery, context: Arc<BotContext>) -> ResponseResult<()> {
    let (Some(data), Some((chat_id, message_id))) = (
        q.data.as_deref(),
        q.message.as_ref().map(|m| (m.chat().id, m.id())),
    ) else {
        bot.answer_callback_query(q.id.clone()).await?;
        return Ok(());
    };

    let outcome = context.handler.handle_callback(chat_id.0, data).await;

    bot.answer_callback_query(q.id.clone())
        .text(outcome.toast)
        .await?;

    if outcome.remove_picker {
        if let Err(e) = bot.delete_message(chat_id, message_id).await {
            error!(error = %e, chat_id = chat_id.0, "Failed to delete alert picker");
        }
    }

    if let Some(text) = outcome.message {
        bot.send_message(chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await?;
        context.stats.record_command();
    }

    Ok(())
}

/// Register bot commands with Telegram for the "/" menu.
async fn register_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    let commands: Vec<BotCommand> = bot_commands()
        .into_iter()
        .map(|(cmd, desc)| BotCommand::new(cmd, desc))
        .collect();

    bot.set_my_commands(commands).await?;
    info!("Registered bot commands with Telegram");
    Ok(())
}
