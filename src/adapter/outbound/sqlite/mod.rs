//! SQLite persistence adapters.
//!
//! Provides SQLite-backed implementations of the alert and metric stores
//! using Diesel ORM.

pub mod alert;
pub mod database;
pub mod metric;

pub use alert::SqliteAlertStore;
pub use database::connection::{open, DbPool};
pub use metric::SqliteMetricStore;
