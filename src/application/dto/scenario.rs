//! Scroll scenarios replayed by the simulator.

use serde::{Deserialize, Serialize};

use crate::domain::entities::ElementId;

/// One user or layout action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Let virtual time pass, in milliseconds.
    Wait(u64),
    /// Scroll to an absolute offset.
    Scroll(f64),
    /// Scroll by a relative offset.
    ScrollBy(f64),
    /// Resize the viewport to a new height.
    Resize(f64),
    /// Rotate the device, changing the viewport height.
    Rotate(f64),
    /// Make an element displayed.
    Show(ElementId),
    /// Set an element to `display: none`.
    Hide(ElementId),
}

/// Ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Creates a scenario from steps.
    #[must_use]
    pub const fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Parses a scenario from TOML.
    ///
    /// # Errors
    /// Returns error if the document is not a valid scenario.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
