use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::trace;

use crate::domain::ports::{ScheduledTask, SchedulerPort};

/// Scheduler construction errors.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Called outside of a tokio runtime.
    #[error("no tokio runtime available: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Runs each task on its own tokio task after sleeping for the delay.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: Handle,
}

impl TokioScheduler {
    /// Creates a scheduler spawning onto `handle`.
    #[must_use]
    pub const fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Creates a scheduler for the runtime this is called from.
    ///
    /// # Errors
    /// Returns error if called outside a tokio runtime.
    pub fn current() -> Result<Self, SchedulerError> {
        Ok(Self::new(Handle::try_current()?))
    }
}

impl SchedulerPort for TokioScheduler {
    fn schedule_once(&self, delay: Duration, task: ScheduledTask) {
        trace!(delay_ms = delay.as_millis(), "Scheduling deferred task");
        let deadline = Instant::now() + delay;
        self.handle.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            task();
        });
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use tokio::sync::oneshot;

    use super::*;

    #[test]
    fn test_current_outside_runtime() {
        assert!(TokioScheduler::current().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let scheduler = TokioScheduler::current().unwrap();
        let start = Instant::now();
        let (tx, rx) = oneshot::channel();

        scheduler.schedule_once(
            Duration::from_millis(200),
            Box::new(move || {
                let _ = tx.send(Instant::now());
            }),
        );

        let fired = rx.await.unwrap();
        assert!(fired - start >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_does_not_run_early() {
        let scheduler = TokioScheduler::current().unwrap();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = ran.clone();

        scheduler.schedule_once(
            Duration::from_millis(200),
            Box::new(move || ran_clone.store(true, Ordering::SeqCst)),
        );

        tokio::time::advance(Duration::from_millis(150)).await;
        tokio::task::yield_now().await;
        assert!(!ran.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(ran.load(Ordering::SeqCst));
    }
}
