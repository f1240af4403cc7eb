//! Periodic refresh driver for live views.
//!
//! The scheduler owns its timer task outright: stopping (or dropping) the
//! scheduler guarantees no further refresh fires. At most one refresh is
//! outstanding at a time - the loop awaits the task inline and skips ticks
//! that land while one is running. Manual triggers run immediately, reset
//! the timer, and bypass the auto-refresh toggle.
//!
//! Tests drive the scheduler under tokio's paused clock, so lifetime
//! properties are checked without wall-clock waits.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default polling cadence for live views.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Drives periodic re-execution of a fetch task while a view is active.
pub struct RefreshScheduler {
    interval: Duration,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

struct Shared {
    /// Manual "refresh now" signal.
    refresh: Notify,
    /// Auto-refresh toggle; manual triggers bypass it.
    enabled: AtomicBool,
}

impl RefreshScheduler {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            shared: Arc::new(Shared {
                refresh: Notify::new(),
                enabled: AtomicBool::new(true),
            }),
            handle: None,
        }
    }

    /// Start polling. `task` runs once per interval tick (while auto-refresh
    /// is enabled) and on every manual trigger.
    ///
    /// Starting again supersedes the previous loop - its in-flight run is
    /// discarded, which is how "last request wins" is enforced when the
    /// request key changes (filters edited, page changed).
    pub fn start<F, Fut>(&mut self, key: impl Into<String>, mut task: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.stop();

        let key = key.into();
        let shared = Arc::clone(&self.shared);
        let interval = self.interval;

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A tick that lands while a refresh is in flight is a no-op,
            // not queued.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick of `interval` completes immediately; the view
            // already fetched on load, so swallow it.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        if shared.enabled.load(Ordering::Relaxed) {
                            tracing::debug!(key = %key, "scheduled refresh");
                            task().await;
                        }
                    }
                    () = shared.refresh.notified() => {
                        tracing::debug!(key = %key, "manual refresh");
                        ticker.reset();
                        task().await;
                    }
                }
            }
        }));
    }

    /// Trigger an immediate refresh and reset the timer. Runs even when
    /// auto-refresh is toggled off.
    pub fn refresh_now(&self) {
        self.shared.refresh.notify_one();
    }

    /// Toggle scheduled polling. Manual triggers are unaffected.
    pub fn set_auto_refresh(&self, enabled: bool) {
        self.shared.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether the polling loop is active.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Stop polling. No further refresh fires after this returns; the timer
    /// handle is released.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
