//! Event target port definition.

use crate::domain::entities::{EventKind, EventTarget, Listener, ListenerId};

/// Port for listener registration on the document and window.
pub trait EventTargetPort: Send + Sync {
    /// Registers `listener` for `kind` events on `target`.
    fn add_listener(&self, target: EventTarget, kind: EventKind, listener: Listener)
    -> ListenerId;

    /// Removes a listener. Returns false if it was not registered.
    fn remove_listener(&self, id: ListenerId) -> bool;
}
