//! Telegram notification delivery and MarkdownV2 formatting.

pub mod format;
pub mod notifier;

pub use notifier::TelegramNotifier;
