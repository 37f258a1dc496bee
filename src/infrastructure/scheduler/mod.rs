//! Scheduler adapters.
//!
//! - [`TokioScheduler`] defers work onto a tokio runtime
//! - [`ManualScheduler`] runs work against a virtual clock

mod manual;
mod tokio_scheduler;

pub use manual::ManualScheduler;
pub use tokio_scheduler::{SchedulerError, TokioScheduler};
