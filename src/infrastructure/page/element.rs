//! Elements of a headless page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    DEFAULT_MARKER_CLASS, DEFAULT_SOURCE_ATTRIBUTE, Display, ElementId, LayoutBox,
};

/// Tag name of image elements.
pub const IMG_TAG: &str = "img";

/// An element with its attributes, style, and layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageElement {
    /// Element id.
    pub id: ElementId,
    /// Lowercase tag name.
    pub tag: String,
    /// Class list in declaration order.
    #[serde(default)]
    pub classes: Vec<String>,
    /// Attributes other than `id`, `class`, and `src`.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Active source.
    #[serde(default)]
    pub src: Option<String>,
    /// Box in document coordinates.
    pub layout: LayoutBox,
    /// Computed display.
    #[serde(default)]
    pub display: Display,
}

impl PageElement {
    /// Creates an `<img>` with no classes, attributes, or source.
    #[must_use]
    pub fn image(id: impl Into<ElementId>, layout: LayoutBox) -> Self {
        Self {
            id: id.into(),
            tag: IMG_TAG.to_string(),
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            src: None,
            layout,
            display: Display::default(),
        }
    }

    /// Creates an `<img class="lazyload" data-src="…">` at `top` with `height`.
    #[must_use]
    pub fn lazy_image(
        id: impl Into<ElementId>,
        pending_source: Option<&str>,
        top: f64,
        height: f64,
    ) -> Self {
        let element = Self::image(id, LayoutBox::new(top, height)).with_class(DEFAULT_MARKER_CLASS);
        match pending_source {
            Some(source) => element.with_attribute(DEFAULT_SOURCE_ATTRIBUTE, source),
            None => element,
        }
    }

    /// Adds a class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.has_class(&class) {
            self.classes.push(class);
        }
        self
    }

    /// Sets an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Sets the computed display.
    #[must_use]
    pub fn with_display(mut self, display: Display) -> Self {
        self.display = display;
        self
    }

    /// Returns true if the class list contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Removes `class` from the class list.
    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Returns true for `<img>` elements.
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.tag == IMG_TAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lazy_image_builder() {
        let element = PageElement::lazy_image("hero", Some("/hero.jpg"), 0.0, 300.0);
        assert!(element.is_image());
        assert!(element.has_class("lazyload"));
        assert_eq!(
            element.attributes.get("data-src").map(String::as_str),
            Some("/hero.jpg")
        );
        assert_eq!(element.src, None);
    }

    #[test]
    fn test_lazy_image_without_source() {
        let element = PageElement::lazy_image("hero", None, 0.0, 300.0);
        assert!(element.attributes.is_empty());
    }

    #[test]
    fn test_class_list_is_a_set() {
        let mut element = PageElement::image("a", LayoutBox::default())
            .with_class("lazyload")
            .with_class("lazyload")
            .with_class("rounded");
        assert_eq!(element.classes, vec!["lazyload", "rounded"]);

        element.remove_class("lazyload");
        assert_eq!(element.classes, vec!["rounded"]);
    }
}
