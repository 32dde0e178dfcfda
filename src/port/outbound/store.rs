//! Persistence ports for alerts and usage counters.

use async_trait::async_trait;

use crate::domain::{Alert, AlertId, NewAlert, StatsSnapshot};
use crate::error::Result;

/// Storage operations for alerts.
///
/// The store is the only source of truth for alerts; callers must not
/// cache its results across evaluation cycles.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Persist a new alert and return it with its assigned id.
    async fn insert(&self, alert: NewAlert) -> Result<Alert>;

    /// Every stored alert, in storage order.
    async fn list_all(&self) -> Result<Vec<Alert>>;

    /// Alerts belonging to one chat, in storage order.
    async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Alert>>;

    /// Delete an alert. Returns `false` if it was already gone.
    async fn delete(&self, id: AlertId) -> Result<bool>;
}

/// Storage for the usage counters.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Load the last saved counters; empty counters if nothing was saved.
    async fn load(&self) -> Result<StatsSnapshot>;

    /// Replace the saved counters with `snapshot`.
    async fn save(&self, snapshot: &StatsSnapshot) -> Result<()>;
}
