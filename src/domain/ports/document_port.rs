//! Document port definition.

use crate::domain::entities::{BoundingBox, CandidateImage, Display, ElementId};
use crate::domain::errors::DomError;

/// Port for reading and mutating page elements.
/// Implementations must be thread-safe.
pub trait DocumentPort: Send + Sync {
    /// Returns ids of `<img>` elements carrying `class`, in document order.
    fn query_images(&self, class: &str) -> Vec<ElementId>;

    /// Returns the bounding client rect of an element.
    fn bounding_box(&self, id: &ElementId) -> Result<BoundingBox, DomError>;

    /// Returns the computed `display` of an element.
    fn computed_display(&self, id: &ElementId) -> Result<Display, DomError>;

    /// Reads an attribute. `Ok(None)` if the element lacks it.
    fn attribute(&self, id: &ElementId, name: &str) -> Result<Option<String>, DomError>;

    /// Sets the active source. `None` leaves the element without a source.
    fn set_source(&self, id: &ElementId, source: Option<String>) -> Result<(), DomError>;

    /// Removes a class from an element's class list.
    fn remove_class(&self, id: &ElementId, class: &str) -> Result<(), DomError>;

    /// Current viewport height.
    fn viewport_height(&self) -> f64;

    /// Gathers everything the visibility predicate needs for one element.
    ///
    /// # Errors
    /// Returns error if the element is no longer in the document.
    fn candidate(&self, id: &ElementId, source_attribute: &str) -> Result<CandidateImage, DomError> {
        Ok(CandidateImage {
            id: id.clone(),
            pending_source: self.attribute(id, source_attribute)?,
            bounds: self.bounding_box(id)?,
            display: self.computed_display(id)?,
        })
    }
}
