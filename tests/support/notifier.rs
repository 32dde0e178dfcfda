use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use paprika_bot::domain::TriggeredAlert;
use paprika_bot::error::{Error, Result};
use paprika_bot::port::Notifier;

/// Notifier that records every alert it is asked to deliver.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<TriggeredAlert>>,
    failing: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent send fail (after recording the attempt).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<TriggeredAlert> {
        self.sent.lock().clone()
    }

    pub fn count(&self) -> usize {
        self.sent.lock().len()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, alert: &TriggeredAlert) -> Result<()> {
        self.sent.lock().push(alert.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Telegram("chat not found".into()));
        }
        Ok(())
    }
}
