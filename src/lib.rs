//! paprika-bot - CoinPaprika prices and price alerts on Telegram.
//!
//! Answers price, supply, volume and overview queries from the CoinPaprika
//! REST API and lets chats register price or percent-move alerts, which a
//! background evaluator checks against a periodically refreshed price cache.
//!
//! # Architecture
//!
//! - [`domain`] - Instruments, quotes, alerts and their trigger rules
//! - [`port`] - Traits at the seams (quote feed, stores, notifier)
//! - [`application`] - Price cache and updater, alert evaluator and
//!   service, supervisor, chat statistics
//! - [`adapter`] - CoinPaprika client, SQLite stores, Telegram chat layer
//! - [`infrastructure`] - Configuration, logging and runtime wiring
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use paprika_bot::infrastructure::{bootstrap, config::Config};
//!
//! # async fn start() -> paprika_bot::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! config.init_logging();
//! bootstrap::run(config).await
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;
