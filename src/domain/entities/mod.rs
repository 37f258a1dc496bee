//! Domain entity definitions.

mod candidate;
mod element;
mod event;
mod geometry;

pub use candidate::{
    CandidateImage, CandidateSet, DEFAULT_MARKER_CLASS, DEFAULT_SOURCE_ATTRIBUTE,
};
pub use element::{Display, ElementId};
pub use event::{EventKind, EventTarget, Listener, ListenerId};
pub use geometry::{BoundingBox, LayoutBox};
