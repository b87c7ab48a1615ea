use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

/// Coalesces bursts of triggers into one delayed task.
///
/// Holds at most one pending timer; scheduling a new one aborts the previous
/// timer if it has not fired yet. Once a timer fires, its action is detached
/// onto its own task and is no longer affected by `schedule` or `cancel`.
/// Dropping the debouncer aborts the pending timer.
#[derive(Default)]
pub struct Debouncer {
    pending: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `action` after `delay` unless another `schedule` or `cancel` comes first.
    ///
    /// Must be called from within a tokio runtime. The action always runs on a
    /// spawned task, so even a zero delay never executes inside the caller.
    pub fn schedule<F>(&self, delay: Duration, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            if delay.is_zero() {
                tokio::task::yield_now().await;
            } else {
                tokio::time::sleep(delay).await;
            }
            tokio::spawn(action);
        });

        let mut guard = self.lock();
        if let Some(previous) = guard.replace(handle) {
            previous.abort();
        }
    }

    /// Aborts the pending timer, if any.
    pub fn cancel(&self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
        }
    }

    /// True while a scheduled timer has neither fired nor been cancelled.
    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
