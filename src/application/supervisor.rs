//! Supervised background tasks.
//!
//! A [`Supervisor`] runs a unit of work in its own task and relaunches it
//! whenever it returns an error or panics. Delays grow exponentially up to a
//! cap, and after a run of consecutive failures the log output drops to
//! debug level so a dead dependency does not flood the logs.

use std::any::Any;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio::task::AbortHandle;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// Restart timing and logging limits.
#[derive(Debug, Clone, PartialEq)]
pub struct RestartPolicy {
    /// Delay before the first relaunch.
    pub initial_delay: Duration,
    /// Upper bound for the relaunch delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each consecutive failure.
    pub multiplier: f64,
    /// Consecutive failures logged in full before dropping to debug.
    pub log_failure_limit: u32,
}

impl Default for RestartPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(10),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            log_failure_limit: 5,
        }
    }
}

/// How a supervised run ended.
#[derive(Debug)]
enum Exit {
    Completed,
    Failed(String),
    Panicked(String),
    Cancelled,
}

/// Relaunches a fallible unit of work until it completes.
pub struct Supervisor {
    name: &'static str,
    policy: RestartPolicy,
    consecutive_failures: u32,
    current_delay: Duration,
    restarts: u32,
}

impl Supervisor {
    #[must_use]
    pub fn new(name: &'static str, policy: RestartPolicy) -> Self {
        let current_delay = policy.initial_delay;
        Self {
            name,
            policy,
            consecutive_failures: 0,
            current_delay,
            restarts: 0,
        }
    }

    /// Run `factory()` until one run returns `Ok(())`.
    ///
    /// Each run is spawned on its own task so a panic is contained and
    /// reported instead of tearing down the caller. A run that lasted at
    /// least `max_delay` counts as healthy and resets the backoff before the
    /// failure is recorded. Returns the number of restarts performed.
    ///
    /// Dropping or aborting the returned future also aborts the running child.
    pub async fn run<F, Fut>(mut self, mut factory: F) -> u32
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        info!(task = self.name, "Supervised task starting");

        loop {
            let started = Instant::now();
            let child = tokio::spawn(factory());
            let _abort = AbortOnDrop(child.abort_handle());
            let exit = match child.await {
                Ok(Ok(())) => Exit::Completed,
                Ok(Err(e)) => Exit::Failed(e.to_string()),
                Err(join) if join.is_panic() => Exit::Panicked(panic_message(join.into_panic())),
                Err(_) => Exit::Cancelled,
            };

            match exit {
                Exit::Completed => {
                    info!(task = self.name, restarts = self.restarts, "Supervised task finished");
                    return self.restarts;
                }
                Exit::Cancelled => {
                    warn!(task = self.name, "Supervised task cancelled");
                    return self.restarts;
                }
                Exit::Failed(reason) | Exit::Panicked(reason) if started.elapsed() >= self.policy.max_delay => {
                    self.reset_backoff();
                    self.record_failure(&reason);
                }
                Exit::Failed(reason) | Exit::Panicked(reason) => self.record_failure(&reason),
            }

            let delay = self.next_delay();
            sleep(delay).await;
            self.restarts += 1;
        }
    }

    fn record_failure(&mut self, reason: &str) {
        self.consecutive_failures += 1;
        let delay_ms = self.current_delay.as_millis() as u64;

        if self.consecutive_failures <= self.policy.log_failure_limit {
            error!(
                task = self.name,
                failures = self.consecutive_failures,
                delay_ms,
                reason,
                "Supervised task failed, restarting"
            );
            if self.consecutive_failures == self.policy.log_failure_limit {
                warn!(
                    task = self.name,
                    "Further consecutive failures are logged at debug level"
                );
            }
        } else {
            debug!(
                task = self.name,
                failures = self.consecutive_failures,
                delay_ms,
                reason,
                "Supervised task failed, restarting"
            );
        }
    }

    fn reset_backoff(&mut self) {
        self.consecutive_failures = 0;
        self.current_delay = self.policy.initial_delay;
    }

    /// Current delay; advances the internal delay for the next call.
    fn next_delay(&mut self) -> Duration {
        let delay = self.current_delay;
        let max = self.policy.max_delay;
        let multiplier = self.policy.multiplier;
        let factor = if multiplier.is_nan() { 1.0 } else { multiplier.max(1.0) };
        let next = Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(max);
        self.current_delay = next.min(max);
        delay
    }
}

/// Aborts the current child when the supervisor itself is dropped.
struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn fast_policy() -> RestartPolicy {
        RestartPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
            multiplier: 2.0,
            log_failure_limit: 2,
        }
    }

    #[test]
    fn next_delay_grows_and_caps() {
        let mut supervisor = Supervisor::new("test", fast_policy());
        assert_eq!(supervisor.next_delay(), Duration::from_millis(1));
        assert_eq!(supervisor.next_delay(), Duration::from_millis(2));
        assert_eq!(supervisor.next_delay(), Duration::from_millis(4));
        assert_eq!(supervisor.next_delay(), Duration::from_millis(4));
    }

    #[test]
    fn next_delay_saturates_on_huge_multiplier() {
        for multiplier in [1e30, f64::INFINITY, f64::MAX] {
            let mut supervisor = Supervisor::new(
                "test",
                RestartPolicy {
                    multiplier,
                    ..fast_policy()
                },
            );
            assert_eq!(supervisor.next_delay(), Duration::from_millis(1));
            assert_eq!(supervisor.next_delay(), Duration::from_millis(4));
            assert_eq!(supervisor.next_delay(), Duration::from_millis(4));
        }
    }

    #[test]
    fn next_delay_treats_nan_multiplier_as_constant() {
        let mut supervisor = Supervisor::new(
            "test",
            RestartPolicy {
                multiplier: f64::NAN,
                ..fast_policy()
            },
        );
        assert_eq!(supervisor.next_delay(), Duration::from_millis(1));
        assert_eq!(supervisor.next_delay(), Duration::from_millis(1));
    }

    #[test]
    fn reset_backoff_restores_initial_delay() {
        let mut supervisor = Supervisor::new("test", fast_policy());
        supervisor.next_delay();
        supervisor.next_delay();
        supervisor.record_failure("boom");
        supervisor.reset_backoff();

        assert_eq!(supervisor.consecutive_failures, 0);
        assert_eq!(supervisor.next_delay(), Duration::from_millis(1));
    }

    #[test]
    fn panic_message_extracts_strings() {
        assert_eq!(panic_message(Box::new("static")), "static");
        assert_eq!(panic_message(Box::new(String::from("owned"))), "owned");
        assert_eq!(panic_message(Box::new(7_u8)), "non-string panic payload");
    }

    #[tokio::test]
    async fn completed_task_is_not_restarted() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let restarts = Supervisor::new("ok", fast_policy())
            .run(move || {
                let counter = Arc::clone(&counter);
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .await;

        assert_eq!(restarts, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_task_is_relaunched() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let restarts = Supervisor::new("panics", fast_policy())
            .run(move || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        panic!("simulated panic {n}");
                    }
                    Ok(())
                }
            })
            .await;

        assert_eq!(restarts, 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn huge_multiplier_keeps_relaunching() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);
        let policy = RestartPolicy {
            multiplier: 1e30,
            ..fast_policy()
        };

        let restarts = Supervisor::new("overflow", policy)
            .run(move || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < 5 {
                        return Err(Error::Connection(format!("attempt {n}")));
                    }
                    Ok(())
                }
            })
            .await;

        assert_eq!(restarts, 5);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn cancelling_supervisor_stops_child() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let slot = Arc::new(parking_lot::Mutex::new(Some(tx)));

        let outer = tokio::spawn(Supervisor::new("forever", fast_policy()).run(move || {
            let held = slot.lock().take();
            async move {
                let _held = held;
                std::future::pending::<Result<()>>().await
            }
        }));
        sleep(Duration::from_millis(20)).await;

        outer.abort();
        assert!(outer.await.unwrap_err().is_cancelled());

        // The sender is dropped only when the child task is torn down.
        let closed = tokio::time::timeout(Duration::from_secs(1), rx).await;
        assert!(matches!(closed, Ok(Err(_))));
    }

    #[tokio::test]
    async fn failing_task_is_relaunched_past_log_limit() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let restarts = Supervisor::new("errors", fast_policy())
            .run(move || {
                let counter = Arc::clone(&counter);
                async move {
                    let n = counter.fetch_add(1, Ordering::SeqCst);
                    if n < 4 {
                        return Err(Error::Connection(format!("attempt {n}")));
                    }
                    Ok(())
                }
            })
            .await;

        assert_eq!(restarts, 4);
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }
}
