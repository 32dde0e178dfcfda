//! Periodic alert evaluation.
//!
//! Each cycle loads every alert from the store, checks it against the
//! current price snapshot and notifies the owning chat when the condition
//! holds. Triggered alerts are then deleted according to the
//! [`DeliveryPolicy`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::application::cache::PriceCache;
use crate::domain::{DeliveryPolicy, Evaluation, TriggeredAlert};
use crate::error::Result;
use crate::port::{AlertStore, Notifier};

/// Counters for one evaluation cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Alerts loaded from the store.
    pub checked: usize,
    /// Alerts whose instrument has no cached price.
    pub skipped_missing_price: usize,
    /// Percent alerts whose baseline was unusable.
    pub skipped_invalid_baseline: usize,
    /// Alerts whose condition held.
    pub triggered: usize,
    /// Notifications that failed to send.
    pub send_failures: usize,
    /// Alerts removed from the store.
    pub deleted: usize,
}

/// Checks stored alerts against the price cache.
#[derive(Clone)]
pub struct AlertEvaluator {
    store: Arc<dyn AlertStore>,
    cache: Arc<PriceCache>,
    notifier: Arc<dyn Notifier>,
    policy: DeliveryPolicy,
    interval: Duration,
    cycle_lock: Arc<Mutex<()>>,
}

impl AlertEvaluator {
    pub fn new(
        store: Arc<dyn AlertStore>,
        cache: Arc<PriceCache>,
        notifier: Arc<dyn Notifier>,
        policy: DeliveryPolicy,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            cache,
            notifier,
            policy,
            interval,
            cycle_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Run one full pass over the stored alerts.
    ///
    /// Passes are serialized: a call made while another pass is running
    /// waits for it to finish. Alerts are processed in storage order
    /// against a single snapshot taken at the start of the pass.
    ///
    /// # Errors
    ///
    /// Fails only if the store cannot be read. Send and delete failures are
    /// logged and counted.
    pub async fn run_cycle(&self) -> Result<CycleReport> {
        let _guard = self.cycle_lock.lock().await;

        let alerts = self.store.list_all().await?;
        let snapshot = self.cache.snapshot();
        let mut report = CycleReport {
            checked: alerts.len(),
            ..CycleReport::default()
        };

        for alert in alerts {
            let Some(quote) = snapshot.get(&alert.instrument) else {
                report.skipped_missing_price += 1;
                debug!(alert_id = %alert.id, instrument = %alert.instrument, "No cached price, skipping");
                continue;
            };

            let trigger = match alert.evaluate(quote.price_usd) {
                Evaluation::Triggered(trigger) => trigger,
                Evaluation::Pending => continue,
                Evaluation::InvalidBaseline => {
                    report.skipped_invalid_baseline += 1;
                    warn!(
                        alert_id = %alert.id,
                        reference_price = alert.reference_price,
                        "Percent alert has no usable baseline, skipping"
                    );
                    continue;
                }
            };

            report.triggered += 1;
            let id = alert.id;
            let triggered = TriggeredAlert::new(alert, quote, trigger);

            let delivered = match self.notifier.notify(&triggered).await {
                Ok(()) => {
                    info!(alert_id = %id, chat_id = triggered.chat_id(), "Alert notification sent");
                    true
                }
                Err(e) => {
                    report.send_failures += 1;
                    error!(alert_id = %id, chat_id = triggered.chat_id(), error = %e, "Alert notification failed");
                    false
                }
            };

            if !self.policy.should_delete(delivered) {
                debug!(alert_id = %id, "Keeping undelivered alert for the next cycle");
                continue;
            }

            match self.store.delete(id).await {
                Ok(true) => report.deleted += 1,
                Ok(false) => debug!(alert_id = %id, "Alert already deleted"),
                Err(e) => {
                    error!(alert_id = %id, error = %e, "Failed to delete triggered alert; it may fire again");
                }
            }
        }

        Ok(report)
    }

    /// Evaluate every `interval` forever.
    ///
    /// A failed store read aborts only the current cycle.
    pub async fn run(self) -> Result<()> {
        info!(interval_secs = self.interval.as_secs(), policy = ?self.policy, "Alert evaluator started");

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match self.run_cycle().await {
                Ok(report) if report.triggered > 0 => info!(
                    checked = report.checked,
                    triggered = report.triggered,
                    send_failures = report.send_failures,
                    deleted = report.deleted,
                    "Alert cycle complete"
                ),
                Ok(report) => debug!(
                    checked = report.checked,
                    skipped = report.skipped_missing_price,
                    "Alert cycle complete"
                ),
                Err(e) => warn!(error = %e, "Alert cycle aborted"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use async_trait::async_trait;
    use chrono::Utc;
    use parking_lot::Mutex as SyncMutex;

    use crate::domain::{Alert, AlertId, AlertKind, InstrumentId, NewAlert, PriceInfo};
    use crate::error::Error;

    #[derive(Default)]
    struct MemoryStore {
        alerts: SyncMutex<Vec<Alert>>,
        fail_reads: SyncMutex<bool>,
    }

    impl MemoryStore {
        fn with(alerts: Vec<Alert>) -> Self {
            Self {
                alerts: SyncMutex::new(alerts),
                fail_reads: SyncMutex::new(false),
            }
        }

        fn ids(&self) -> Vec<i64> {
            self.alerts.lock().iter().map(|a| a.id.value()).collect()
        }
    }

    #[async_trait]
    impl AlertStore for MemoryStore {
        async fn insert(&self, _alert: NewAlert) -> Result<Alert> {
            Err(Error::Database("read-only fake".into()))
        }

        async fn list_all(&self) -> Result<Vec<Alert>> {
            if *self.fail_reads.lock() {
                return Err(Error::Database("disk on fire".into()));
            }
            Ok(self.alerts.lock().clone())
        }

        async fn list_by_chat(&self, chat_id: i64) -> Result<Vec<Alert>> {
            Ok(self
                .alerts
                .lock()
                .iter()
                .filter(|a| a.chat_id == chat_id)
                .cloned()
                .collect())
        }

        async fn delete(&self, id: AlertId) -> Result<bool> {
            let mut alerts = self.alerts.lock();
            let before = alerts.len();
            alerts.retain(|a| a.id != id);
            Ok(alerts.len() != before)
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        sent: SyncMutex<HashMap<i64, usize>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, alert: &TriggeredAlert) -> Result<()> {
            if self.fail {
                return Err(Error::Telegram("chat not found".into()));
            }
            *self.sent.lock().entry(alert.alert.id.value()).or_default() += 1;
            Ok(())
        }
    }

    fn quote(id: &str, price: f64) -> PriceInfo {
        PriceInfo {
            id: InstrumentId::from(id),
            seq: 1,
            name: id.to_uppercase(),
            symbol: id.to_uppercase(),
            price_usd: price,
            market_cap: 0.0,
            percent_change_24h: 0.0,
            last_updated: String::new(),
        }
    }

    fn alert(id: i64, instrument: &str, kind: AlertKind, target: f64, reference: f64) -> Alert {
        Alert {
            id: AlertId::new(id),
            chat_id: 42,
            instrument: InstrumentId::from(instrument),
            target,
            reference_price: reference,
            kind,
            created_at: Utc::now(),
        }
    }

    fn evaluator(
        store: Arc<MemoryStore>,
        cache: Arc<PriceCache>,
        notifier: Arc<CountingNotifier>,
        policy: DeliveryPolicy,
    ) -> AlertEvaluator {
        AlertEvaluator::new(store, cache, notifier, policy, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn triggered_alert_is_sent_and_deleted() {
        let store = Arc::new(MemoryStore::with(vec![alert(1, "x", AlertKind::Price, 100.0, 90.0)]));
        let cache = Arc::new(PriceCache::new());
        cache.replace(vec![quote("x", 100.0)]);
        let notifier = Arc::new(CountingNotifier::default());

        let eval = evaluator(store.clone(), cache, notifier.clone(), DeliveryPolicy::AtMostOnce);
        let report = eval.run_cycle().await.unwrap();

        assert_eq!(report.triggered, 1);
        assert_eq!(report.deleted, 1);
        assert!(store.ids().is_empty());
        assert_eq!(notifier.sent.lock().get(&1), Some(&1));
    }

    #[tokio::test]
    async fn missing_price_leaves_alert_untouched() {
        let store = Arc::new(MemoryStore::with(vec![alert(2, "y", AlertKind::Price, 1.0, 1.0)]));
        let cache = Arc::new(PriceCache::new());
        cache.replace(vec![quote("x", 100.0)]);
        let notifier = Arc::new(CountingNotifier::default());

        let report = evaluator(store.clone(), cache, notifier, DeliveryPolicy::AtMostOnce)
            .run_cycle()
            .await
            .unwrap();

        assert_eq!(report.skipped_missing_price, 1);
        assert_eq!(report.triggered, 0);
        assert_eq!(store.ids(), vec![2]);
    }

    #[tokio::test]
    async fn send_failure_respects_delivery_policy() {
        let cache = Arc::new(PriceCache::new());
        cache.replace(vec![quote("x", 100.0)]);
        let failing = Arc::new(CountingNotifier {
            fail: true,
            ..CountingNotifier::default()
        });

        let store = Arc::new(MemoryStore::with(vec![alert(1, "x", AlertKind::Price, 50.0, 40.0)]));
        let report = evaluator(store.clone(), cache.clone(), failing.clone(), DeliveryPolicy::AtMostOnce)
            .run_cycle()
            .await
            .unwrap();
        assert_eq!(report.send_failures, 1);
        assert!(store.ids().is_empty());

        let store = Arc::new(MemoryStore::with(vec![alert(1, "x", AlertKind::Price, 50.0, 40.0)]));
        let report = evaluator(store.clone(), cache, failing, DeliveryPolicy::AtLeastOnce)
            .run_cycle()
            .await
            .unwrap();
        assert_eq!(report.send_failures, 1);
        assert_eq!(report.deleted, 0);
        assert_eq!(store.ids(), vec![1]);
    }

    #[tokio::test]
    async fn invalid_baseline_is_skipped_not_fired() {
        let store = Arc::new(MemoryStore::with(vec![alert(3, "x", AlertKind::Percent, 10.0, 0.0)]));
        let cache = Arc::new(PriceCache::new());
        cache.replace(vec![quote("x", 100.0)]);
        let notifier = Arc::new(CountingNotifier::default());

        let report = evaluator(store.clone(), cache, notifier, DeliveryPolicy::AtMostOnce)
            .run_cycle()
            .await
            .unwrap();

        assert_eq!(report.skipped_invalid_baseline, 1);
        assert_eq!(store.ids(), vec![3]);
    }

    #[tokio::test]
    async fn store_read_failure_aborts_cycle() {
        let store = Arc::new(MemoryStore::default());
        *store.fail_reads.lock() = true;
        let eval = evaluator(
            store,
            Arc::new(PriceCache::new()),
            Arc::new(CountingNotifier::default()),
            DeliveryPolicy::AtMostOnce,
        );

        assert!(eval.run_cycle().await.is_err());
    }
}
