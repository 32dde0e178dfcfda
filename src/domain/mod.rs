//! Provider-agnostic domain types.
//!
//! Nothing in here performs I/O; quotes, alerts and counters are plain data
//! plus the rules that operate on them.

pub mod alert;
pub mod coin;
pub mod id;
pub mod price;
pub mod stats;

pub use alert::{
    percent_change, Alert, AlertKind, AlertTarget, DeliveryPolicy, Evaluation, NewAlert,
    Trigger, TriggeredAlert,
};
pub use coin::{Coin, TickerDetails};
pub use id::{AlertId, InstrumentId};
pub use price::{PriceInfo, Snapshot};
pub use stats::StatsSnapshot;
