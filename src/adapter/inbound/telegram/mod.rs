//! Telegram chat layer.
//!
//! Parses commands, answers them through the application services and
//! drives the teloxide dispatcher for messages and alert picker callbacks.

pub mod command;
pub mod dispatch;
pub mod handler;
pub mod render;

pub use dispatch::{run_dispatcher, BotContext};
pub use handler::{CommandHandler, HandlerConfig, Reply};
