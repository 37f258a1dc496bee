//! Document access error types.

use thiserror::Error;

use crate::domain::entities::ElementId;

/// Errors raised by document ports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// The element is no longer attached to the document.
    #[error("element not found: {0}")]
    ElementNotFound(ElementId),
}

impl DomError {
    /// Creates not-found error.
    #[must_use]
    pub fn not_found(id: impl Into<ElementId>) -> Self {
        Self::ElementNotFound(id.into())
    }
}
