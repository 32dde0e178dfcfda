//! Notifier port for triggered alerts.

use async_trait::async_trait;

use crate::domain::TriggeredAlert;
use crate::error::Result;

/// Delivers alert notifications to a chat.
///
/// Implementations must be thread-safe (`Send + Sync`). A returned error
/// means the message was not delivered; the caller decides what to do
/// with the alert.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send a notification for a triggered alert to its chat.
    async fn notify(&self, alert: &TriggeredAlert) -> Result<()>;
}
