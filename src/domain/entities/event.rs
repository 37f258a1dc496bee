//! Page events and listener handles.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Events the loader reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    /// The document finished parsing.
    DomContentLoaded,
    /// The document scrolled.
    Scroll,
    /// The window was resized.
    Resize,
    /// The device orientation changed.
    OrientationChange,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::DomContentLoaded => "DOMContentLoaded",
            Self::Scroll => "scroll",
            Self::Resize => "resize",
            Self::OrientationChange => "orientationchange",
        };
        f.write_str(name)
    }
}

/// Object a listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventTarget {
    /// The document.
    Document,
    /// The window.
    Window,
}

/// Handle returned on listener registration, used to remove it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Callback invoked on dispatch.
pub type Listener = Arc<dyn Fn(EventKind) + Send + Sync>;
