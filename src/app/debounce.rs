//! Cancellable delayed task.
//!
//! Each call to [`Debouncer::schedule`] aborts the task scheduled before it and
//! starts a fresh timer, so a burst of changes results in a single run once the
//! burst has been quiet for the configured delay.

use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Runs only the most recently scheduled task, after a fixed quiet period.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending task with `task`, to run after the quiet period.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn schedule<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.cancel();
        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        }));
        trace!("Scheduled debounced task in {:?}", delay);
    }

    /// Aborts the pending task. Returns true if one was still waiting or running.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                trace!("Cancelled debounced task");
                true
            }
            _ => false,
        }
    }

    /// True while a scheduled task has not finished.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> Arc<Mutex<Vec<u32>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(runs: &Arc<Mutex<Vec<u32>>>, value: u32) -> impl Future<Output = ()> + Send + 'static {
        let runs = Arc::clone(runs);
        async move { runs.lock().unwrap().push(value) }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_only_last_task() {
        let runs = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        for i in 0..3 {
            debouncer.schedule(record(&runs, i));
        }
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*runs.lock().unwrap(), vec![2]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_schedule_restarts_timer() {
        let runs = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(500));

        debouncer.schedule(record(&runs, 1));
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.schedule(record(&runs, 2));
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(runs.lock().unwrap().is_empty(), "timer should have restarted");

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*runs.lock().unwrap(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_run() {
        let runs = recorder();
        let mut debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.schedule(record(&runs, 7));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(runs.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_task() {
        let runs = recorder();
        {
            let mut debouncer = Debouncer::new(Duration::from_millis(100));
            debouncer.schedule(record(&runs, 9));
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(runs.lock().unwrap().is_empty());
    }
}
