//! Page element identity and computed style.

use serde::{Deserialize, Serialize};

/// Identifier of an element within a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub String);

impl ElementId {
    /// Creates a new `ElementId` from any string-like input.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ElementId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Computed `display` value of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    /// `display: inline` (the initial value for images).
    #[default]
    Inline,
    /// `display: block`.
    Block,
    /// `display: inline-block`.
    InlineBlock,
    /// `display: flex`.
    Flex,
    /// `display: none`; the element generates no box.
    None,
}

impl Display {
    /// Parses a CSS `display` keyword. Unknown keywords map to `Block`.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "inline" => Self::Inline,
            "inline-block" => Self::InlineBlock,
            "flex" => Self::Flex,
            _ => Self::Block,
        }
    }

    /// Returns true unless the element is `display: none`.
    #[must_use]
    pub const fn is_displayed(self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for Display {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keyword = match self {
            Self::Inline => "inline",
            Self::Block => "block",
            Self::InlineBlock => "inline-block",
            Self::Flex => "flex",
            Self::None => "none",
        };
        f.write_str(keyword)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_parse() {
        assert_eq!(Display::parse("none"), Display::None);
        assert_eq!(Display::parse(" NONE "), Display::None);
        assert_eq!(Display::parse("inline-block"), Display::InlineBlock);
        assert_eq!(Display::parse("grid"), Display::Block);
    }

    #[test]
    fn test_only_none_is_hidden() {
        assert!(!Display::None.is_displayed());
        assert!(Display::Inline.is_displayed());
        assert!(Display::Block.is_displayed());
    }

    #[test]
    fn test_element_id_display() {
        let id = ElementId::from("hero");
        assert_eq!(id.to_string(), "hero");
        assert_eq!(id.as_str(), "hero");
    }
}
