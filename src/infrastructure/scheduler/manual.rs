use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::domain::ports::{ScheduledTask, SchedulerPort};

struct Entry {
    due: Duration,
    seq: u64,
    task: ScheduledTask,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    queue: Vec<Entry>,
}

impl ManualState {
    fn pop_due(&mut self, until: Duration) -> Option<Entry> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= until)
            .min_by_key(|(_, e)| (e.due, e.seq))
            .map(|(i, _)| i)?;
        Some(self.queue.swap_remove(index))
    }
}

/// Scheduler driven by a virtual clock.
///
/// Nothing runs until [`ManualScheduler::advance`] moves the clock past a
/// task's due time. Tasks run on the calling thread, earliest first, ties in
/// scheduling order.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ManualScheduler")
            .field("now", &state.now)
            .field("pending", &state.queue.len())
            .finish()
    }
}

impl ManualScheduler {
    /// Creates a scheduler with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Number of tasks not yet run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }

    /// Due time of the earliest queued task.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.state.lock().queue.iter().map(|e| e.due).min()
    }

    /// Moves the clock forward by `by`, running every task that becomes due.
    ///
    /// Tasks scheduled by running tasks also run if they fall due within the
    /// window. Returns the number of tasks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.lock().now + by;
        let mut ran = 0;

        loop {
            let entry = {
                let mut state = self.state.lock();
                let Some(entry) = state.pop_due(target) else {
                    state.now = target;
                    break;
                };
                state.now = entry.due;
                entry
            };
            trace!(due_ms = entry.due.as_millis(), "Running scheduled task");
            (entry.task)();
            ran += 1;
        }

        ran
    }
}

impl SchedulerPort for ManualScheduler {
    fn schedule_once(&self, delay: Duration, task: ScheduledTask) {
        let mut state = self.state.lock();
        let due = state.now + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.push(Entry { due, seq, task });
    }
}
