//! Port definitions implemented by page and timer adapters.

mod document_port;
mod event_target_port;
mod scheduler_port;

pub use document_port::DocumentPort;
pub use event_target_port::EventTargetPort;
pub use scheduler_port::{ScheduledTask, SchedulerPort};

#[cfg(test)]
pub mod mocks {
    pub use super::scheduler_port::MockSchedulerPort;
}
