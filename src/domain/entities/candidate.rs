//! Lazy-load candidates.

use super::{BoundingBox, Display, ElementId};

/// Marker class carried by images awaiting deferred loading.
pub const DEFAULT_MARKER_CLASS: &str = "lazyload";

/// Data attribute holding the deferred source URL.
pub const DEFAULT_SOURCE_ATTRIBUTE: &str = "data-src";

/// Snapshot of a candidate image taken at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateImage {
    /// Element the snapshot was taken from.
    pub id: ElementId,
    /// Deferred source URL. `None` when the data attribute is missing.
    pub pending_source: Option<String>,
    /// Bounding client rect.
    pub bounds: BoundingBox,
    /// Computed display.
    pub display: Display,
}

impl CandidateImage {
    /// Visibility predicate: the box intersects `[0, viewport_height]`
    /// and the element is not `display: none`.
    #[must_use]
    pub fn is_visible(&self, viewport_height: f64) -> bool {
        self.bounds.intersects_viewport(viewport_height) && self.display.is_displayed()
    }
}

/// Ordered set of candidates still awaiting resolution.
///
/// Populated once; only ever shrinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    ids: Vec<ElementId>,
}

impl CandidateSet {
    /// Creates a set from ids in document order. Duplicates are dropped.
    #[must_use]
    pub fn new(ids: impl IntoIterator<Item = ElementId>) -> Self {
        let mut set = Self::default();
        for id in ids {
            if !set.contains(&id) {
                set.ids.push(id);
            }
        }
        set
    }

    /// Returns the remaining ids in order.
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// Returns true if `id` is still pending.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    /// Removes `id`. Returns false if it was not present.
    pub fn remove(&mut self, id: &ElementId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|candidate| candidate != id);
        self.ids.len() != before
    }

    /// Number of pending candidates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
