//! Outbound adapters (driven side).

pub mod coinpaprika;
pub mod sqlite;
pub mod telegram;
