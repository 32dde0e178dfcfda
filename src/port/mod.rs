//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports are the seams between the application services and the outside
//! world. Adapters implement them; tests substitute in-memory fakes.
//!
//! # Architecture
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │      Application        │
//!                    │                         │
//!     ┌──────────────┤  Domain + Port          ├──────────────┐
//!     │              │                         │              │
//!     │              └─────────────────────────┘              │
//!     │                         │                             │
//!     ▼                         ▼                             ▼
//! ┌─────────┐            ┌─────────────┐              ┌───────────┐
//! │ Market  │            │   Store     │              │ Notifier  │
//! │  Data   │            │   Adapter   │              │  Adapter  │
//! └─────────┘            └─────────────┘              └───────────┘
//! ```
//!
//! # Available Ports
//!
//! - [`TickerFeed`], [`CoinLookup`] - Quote provider
//! - [`AlertStore`], [`MetricStore`] - Persistence
//! - [`Notifier`] - Delivery of triggered alerts

pub mod outbound;

pub use outbound::market::{CoinLookup, TickerFeed};
pub use outbound::notifier::Notifier;
pub use outbound::store::{AlertStore, MetricStore};
