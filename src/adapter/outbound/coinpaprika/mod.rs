//! CoinPaprika quote provider integration.

pub mod client;
pub mod dto;
pub mod settings;

pub use client::CoinPaprikaClient;
pub use settings::CoinPaprikaConfig;
