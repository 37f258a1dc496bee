//! Simulation error types.

use thiserror::Error;

use super::DomError;
use crate::domain::entities::ElementId;

/// Errors raised while replaying a scenario.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A step referenced an element the page does not contain.
    #[error("scenario references unknown element: {0}")]
    UnknownElement(ElementId),
}

impl From<DomError> for SimulationError {
    fn from(error: DomError) -> Self {
        match error {
            DomError::ElementNotFound(id) => Self::UnknownElement(id),
        }
    }
}
