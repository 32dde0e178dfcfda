//! Application services (use cases).
//!
//! These services orchestrate domain logic and coordinate adapters
//! to implement the application's use cases.

pub mod alert;
pub mod cache;
pub mod price;
pub mod stats;
pub mod supervisor;

pub use alert::{AlertEvaluator, AlertService, CycleReport};
pub use cache::PriceCache;
pub use price::{PriceUpdater, PriceUpdaterConfig};
pub use stats::BotStats;
pub use supervisor::{RestartPolicy, Supervisor};
