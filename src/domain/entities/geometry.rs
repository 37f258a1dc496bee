//! Layout geometry.

use serde::{Deserialize, Serialize};

/// Box of an element in document coordinates (before scrolling).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Distance from the top of the document.
    pub top: f64,
    /// Rendered height.
    pub height: f64,
}

impl LayoutBox {
    /// Creates a new layout box.
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Returns the box relative to a viewport scrolled by `scroll_y`.
    #[must_use]
    pub fn to_client(self, scroll_y: f64) -> BoundingBox {
        let top = self.top - scroll_y;
        BoundingBox {
            top,
            bottom: top + self.height,
        }
    }
}

/// Bounding client rect of an element, relative to the viewport's top edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Top edge.
    pub top: f64,
    /// Bottom edge.
    pub bottom: f64,
}

impl BoundingBox {
    /// Creates a new bounding box.
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Returns true if the box touches the band `[0, viewport_height]`.
    /// Both edges are inclusive.
    #[must_use]
    pub fn intersects_viewport(&self, viewport_height: f64) -> bool {
        self.top <= viewport_height && self.bottom >= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_client_applies_scroll() {
        let layout = LayoutBox::new(1200.0, 100.0);
        let rect = layout.to_client(1000.0);
        assert!((rect.top - 200.0).abs() < f64::EPSILON);
        assert!((rect.bottom - 300.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_edges_are_inclusive() {
        assert!(BoundingBox::new(800.0, 900.0).intersects_viewport(800.0));
        assert!(BoundingBox::new(-100.0, 0.0).intersects_viewport(800.0));
        assert!(!BoundingBox::new(800.5, 900.0).intersects_viewport(800.0));
        assert!(!BoundingBox::new(-100.0, -0.5).intersects_viewport(800.0));
    }
}
