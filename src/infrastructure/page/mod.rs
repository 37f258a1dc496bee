//! Headless page.
//!
//! An in-memory stand-in for a browser document and window:
//! - element storage with layout boxes and computed display
//! - a scrollable viewport
//! - listener registration and synchronous event dispatch

mod element;
pub mod markup;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, trace};

use crate::domain::entities::{
    BoundingBox, Display, ElementId, EventKind, EventTarget, Listener, ListenerId,
};
use crate::domain::errors::DomError;
use crate::domain::ports::{DocumentPort, EventTargetPort};

pub use element::{IMG_TAG, PageElement};
pub use markup::{DEFAULT_IMAGE_HEIGHT, parse_html};

/// Viewport height used when none is configured.
pub const DEFAULT_VIEWPORT_HEIGHT: f64 = 800.0;

struct PageState {
    elements: Vec<PageElement>,
    viewport_height: f64,
    scroll_y: f64,
    ready: bool,
}

impl PageState {
    fn find(&self, id: &ElementId) -> Result<&PageElement, DomError> {
        self.elements
            .iter()
            .find(|e| &e.id == id)
            .ok_or_else(|| DomError::not_found(id.clone()))
    }

    fn find_mut(&mut self, id: &ElementId) -> Result<&mut PageElement, DomError> {
        self.elements
            .iter_mut()
            .find(|e| &e.id == id)
            .ok_or_else(|| DomError::not_found(id.clone()))
    }

    fn document_height(&self) -> f64 {
        self.elements
            .iter()
            .filter(|e| e.display.is_displayed())
            .map(|e| e.layout.top + e.layout.height)
            .fold(self.viewport_height, f64::max)
    }

    fn max_scroll(&self) -> f64 {
        (self.document_height() - self.viewport_height).max(0.0)
    }
}

struct Registration {
    id: ListenerId,
    target: EventTarget,
    kind: EventKind,
    listener: Listener,
}

#[derive(Default)]
struct ListenerRegistry {
    next_id: u64,
    entries: Vec<Registration>,
}

/// In-memory page implementing the document and event target ports.
pub struct HeadlessPage {
    state: RwLock<PageState>,
    listeners: Mutex<ListenerRegistry>,
}

impl std::fmt::Debug for HeadlessPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("HeadlessPage")
            .field("elements", &state.elements.len())
            .field("viewport_height", &state.viewport_height)
            .field("scroll_y", &state.scroll_y)
            .field("ready", &state.ready)
            .finish_non_exhaustive()
    }
}

impl Default for HeadlessPage {
    fn default() -> Self {
        Self::new(DEFAULT_VIEWPORT_HEIGHT)
    }
}

impl HeadlessPage {
    /// Creates an empty page with the given viewport height.
    #[must_use]
    pub fn new(viewport_height: f64) -> Self {
        Self {
            state: RwLock::new(PageState {
                elements: Vec::new(),
                viewport_height,
                scroll_y: 0.0,
                ready: false,
            }),
            listeners: Mutex::new(ListenerRegistry::default()),
        }
    }

    /// Creates a page holding `elements` in document order.
    #[must_use]
    pub fn with_elements(viewport_height: f64, elements: Vec<PageElement>) -> Self {
        let page = Self::new(viewport_height);
        for element in elements {
            page.insert(element);
        }
        page
    }

    /// Appends an element. Returns false if the id is already taken.
    pub fn insert(&self, element: PageElement) -> bool {
        let mut state = self.state.write();
        if state.elements.iter().any(|e| e.id == element.id) {
            return false;
        }
        state.elements.push(element);
        true
    }

    /// Detaches an element from the document.
    pub fn remove(&self, id: &ElementId) -> Option<PageElement> {
        let mut state = self.state.write();
        let index = state.elements.iter().position(|e| &e.id == id)?;
        Some(state.elements.remove(index))
    }

    /// Returns a copy of an element.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<PageElement> {
        self.state.read().find(id).ok().cloned()
    }

    /// Returns copies of all elements in document order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<PageElement> {
        self.state.read().elements.clone()
    }

    /// Current scroll offset.
    #[must_use]
    pub fn scroll_y(&self) -> f64 {
        self.state.read().scroll_y
    }

    /// Height of the laid-out content, at least the viewport height.
    #[must_use]
    pub fn document_height(&self) -> f64 {
        self.state.read().document_height()
    }

    /// Returns true once the ready signal has fired.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.state.read().ready
    }

    /// Fires `DOMContentLoaded`. Returns false if it already fired.
    pub fn fire_ready(&self) -> bool {
        {
            let mut state = self.state.write();
            if state.ready {
                return false;
            }
            state.ready = true;
        }
        debug!("Page ready");
        self.dispatch(EventTarget::Document, EventKind::DomContentLoaded);
        true
    }

    /// Scrolls to `y`, clamped to the scrollable range, and fires `scroll`.
    pub fn scroll_to(&self, y: f64) {
        let scroll_y = {
            let mut state = self.state.write();
            state.scroll_y = y.clamp(0.0, state.max_scroll());
            state.scroll_y
        };
        trace!(scroll_y, "Scrolled");
        self.dispatch(EventTarget::Document, EventKind::Scroll);
    }

    /// Scrolls by `dy` and fires `scroll`.
    pub fn scroll_by(&self, dy: f64) {
        let y = self.scroll_y() + dy;
        self.scroll_to(y);
    }

    /// Changes the viewport height and fires `resize`.
    pub fn resize(&self, viewport_height: f64) {
        self.set_viewport_height(viewport_height);
        self.dispatch(EventTarget::Window, EventKind::Resize);
    }

    /// Changes the viewport height and fires `orientationchange`.
    pub fn rotate(&self, viewport_height: f64) {
        self.set_viewport_height(viewport_height);
        self.dispatch(EventTarget::Window, EventKind::OrientationChange);
    }

    fn set_viewport_height(&self, viewport_height: f64) {
        let mut state = self.state.write();
        state.viewport_height = viewport_height.max(0.0);
        state.scroll_y = state.scroll_y.min(state.max_scroll());
    }

    /// Changes an element's computed display without firing any event.
    ///
    /// # Errors
    /// Returns error if the element does not exist.
    pub fn set_display(&self, id: &ElementId, display: Display) -> Result<(), DomError> {
        self.state.write().find_mut(id)?.display = display;
        Ok(())
    }

    /// Invokes every listener registered for `kind` on `target`.
    ///
    /// Listeners added during dispatch are not invoked for this event;
    /// listeners removed during dispatch are skipped. Returns the number
    /// of listeners invoked.
    pub fn dispatch(&self, target: EventTarget, kind: EventKind) -> usize {
        let matching: Vec<(ListenerId, Listener)> = self
            .listeners
            .lock()
            .entries
            .iter()
            .filter(|r| r.target == target && r.kind == kind)
            .map(|r| (r.id, r.listener.clone()))
            .collect();

        let mut invoked = 0;
        for (id, listener) in matching {
            let registered = self.listeners.lock().entries.iter().any(|r| r.id == id);
            if registered {
                listener(kind);
                invoked += 1;
            }
        }
        trace!(%kind, ?target, invoked, "Event dispatched");
        invoked
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    /// Number of listeners registered for `kind` on any target.
    #[must_use]
    pub fn listener_count_for(&self, kind: EventKind) -> usize {
        self.listeners
            .lock()
            .entries
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }
}

impl DocumentPort for HeadlessPage {
    fn query_images(&self, class: &str) -> Vec<ElementId> {
        self.state
            .read()
            .elements
            .iter()
            .filter(|e| e.is_image() && e.has_class(class))
            .map(|e| e.id.clone())
            .collect()
    }

    fn bounding_box(&self, id: &ElementId) -> Result<BoundingBox, DomError> {
        let state = self.state.read();
        let element = state.find(id)?;
        if element.display.is_displayed() {
            Ok(element.layout.to_client(state.scroll_y))
        } else {
            Ok(BoundingBox::default())
        }
    }

    fn computed_display(&self, id: &ElementId) -> Result<Display, DomError> {
        Ok(self.state.read().find(id)?.display)
    }

    fn attribute(&self, id: &ElementId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.state.read().find(id)?.attributes.get(name).cloned())
    }

    fn set_source(&self, id: &ElementId, source: Option<String>) -> Result<(), DomError> {
        self.state.write().find_mut(id)?.src = source;
        Ok(())
    }

    fn remove_class(&self, id: &ElementId, class: &str) -> Result<(), DomError> {
        self.state.write().find_mut(id)?.remove_class(class);
        Ok(())
    }

    fn viewport_height(&self) -> f64 {
        self.state.read().viewport_height
    }
}

impl EventTargetPort for HeadlessPage {
    fn add_listener(
        &self,
        target: EventTarget,
        kind: EventKind,
        listener: Listener,
    ) -> ListenerId {
        let mut registry = self.listeners.lock();
        registry.next_id += 1;
        let id = ListenerId(registry.next_id);
        registry.entries.push(Registration {
            id,
            target,
            kind,
            listener,
        });
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut registry = self.listeners.lock();
        let before = registry.entries.len();
        registry.entries.retain(|r| r.id != id);
        registry.entries.len() != before
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::domain::entities::LayoutBox;

    fn tall_page() -> HeadlessPage {
        HeadlessPage::with_elements(
            800.0,
            vec![
                PageElement::lazy_image("top", Some("/top.png"), 0.0, 200.0),
                PageElement::lazy_image("bottom", Some("/bottom.png"), 3000.0, 200.0),
            ],
        )
    }

    fn counter(page: &HeadlessPage, target: EventTarget, kind: EventKind) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        page.add_listener(
            target,
            kind,
            Arc::new(move |_: EventKind| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        hits
    }

    #[test]
    fn test_bounding_box_follows_scroll() {
        let page = tall_page();
        let id = ElementId::from("bottom");

        assert_eq!(page.bounding_box(&id), Ok(BoundingBox::new(3000.0, 3200.0)));
        page.scroll_to(2200.0);
        assert_eq!(page.bounding_box(&id), Ok(BoundingBox::new(800.0, 1000.0)));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let page = tall_page();
        page.scroll_to(-50.0);
        assert!(page.scroll_y().abs() < f64::EPSILON);
        page.scroll_to(1_000_000.0);
        assert!((page.scroll_y() - 2400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hidden_element_has_empty_box() {
        let page = tall_page();
        let id = ElementId::from("bottom");
        page.set_display(&id, Display::None).unwrap();
        assert_eq!(page.bounding_box(&id), Ok(BoundingBox::default()));
        assert_eq!(page.computed_display(&id), Ok(Display::None));
    }

    #[test]
    fn test_query_images_filters_tag_and_class() {
        let page = tall_page();
        let mut div =
            PageElement::image("banner", LayoutBox::new(0.0, 10.0)).with_class("lazyload");
        div.tag = "div".to_string();
        page.insert(div);
        page.insert(PageElement::image("plain", LayoutBox::new(0.0, 10.0)));

        let ids = page.query_images("lazyload");
        assert_eq!(ids, vec![ElementId::from("top"), ElementId::from("bottom")]);
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let page = tall_page();
        assert!(!page.insert(PageElement::lazy_image("top", None, 0.0, 1.0)));
    }

    #[test]
    fn test_mutations_on_missing_element() {
        let page = tall_page();
        let id = ElementId::from("gone");
        assert_eq!(
            page.set_source(&id, Some("/x.png".to_string())),
            Err(DomError::not_found("gone"))
        );
        assert!(page.remove_class(&id, "lazyload").is_err());
        assert!(page.attribute(&id, "data-src").is_err());
    }

    #[test]
    fn test_dispatch_respects_target_and_kind() {
        let page = tall_page();
        let scrolls = counter(&page, EventTarget::Document, EventKind::Scroll);
        let resizes = counter(&page, EventTarget::Window, EventKind::Resize);

        page.scroll_to(100.0);
        page.scroll_by(100.0);
        page.resize(600.0);
        page.dispatch(EventTarget::Window, EventKind::Scroll);

        assert_eq!(scrolls.load(Ordering::SeqCst), 2);
        assert_eq!(resizes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_removed_listener_is_not_invoked() {
        let page = tall_page();
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let id = page.add_listener(
            EventTarget::Window,
            EventKind::OrientationChange,
            Arc::new(move |_: EventKind| {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert!(page.remove_listener(id));
        assert!(!page.remove_listener(id));
        page.rotate(400.0);

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!((page.viewport_height() - 400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ready_fires_once() {
        let page = tall_page();
        let ready = counter(&page, EventTarget::Document, EventKind::DomContentLoaded);

        assert!(page.fire_ready());
        assert!(!page.fire_ready());
        assert!(page.is_ready());
        assert_eq!(ready.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_may_reenter_page() {
        let page = Arc::new(tall_page());
        let weak = Arc::downgrade(&page);
        page.add_listener(
            EventTarget::Document,
            EventKind::DomContentLoaded,
            Arc::new(move |_: EventKind| {
                if let Some(page) = weak.upgrade() {
                    page.add_listener(
                        EventTarget::Document,
                        EventKind::Scroll,
                        Arc::new(|_: EventKind| {}),
                    );
                    let _ = page.query_images("lazyload");
                }
            }),
        );

        assert_eq!(
            page.dispatch(EventTarget::Document, EventKind::DomContentLoaded),
            1
        );
        assert_eq!(page.listener_count_for(EventKind::Scroll), 1);
    }
}
