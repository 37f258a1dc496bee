//! Domain layer with page entities, errors, and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{CandidateImage, CandidateSet, Display, ElementId, EventKind, EventTarget};
pub use errors::DomError;
pub use ports::{DocumentPort, EventTargetPort, SchedulerPort};
