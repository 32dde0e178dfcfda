//! Inbound adapters (driving side).

pub mod cli;
pub mod http;
pub mod telegram;
