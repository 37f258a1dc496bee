//! Scheduler port definition.

use std::time::Duration;

/// Work deferred by a scheduler.
pub type ScheduledTask = Box<dyn FnOnce() + Send + 'static>;

/// Port for one-shot deferred execution.
///
/// A scheduled task runs exactly once after at least `delay` has elapsed.
/// There is no cancellation.
#[cfg_attr(test, mockall::automock)]
pub trait SchedulerPort: Send + Sync {
    /// Schedules `task` to run after `delay`.
    fn schedule_once(&self, delay: Duration, task: ScheduledTask);
}
