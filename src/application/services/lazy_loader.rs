//! Viewport-proximity image loader.
//!
//! Watches images carrying a marker class and promotes their deferred source
//! to the active one once they intersect the viewport. Checks are debounced:
//! at most one pass is pending at any time and triggers arriving meanwhile
//! are dropped.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::domain::entities::{
    CandidateImage, CandidateSet, DEFAULT_MARKER_CLASS, DEFAULT_SOURCE_ATTRIBUTE, ElementId,
    EventKind, EventTarget, ListenerId,
};
use crate::domain::errors::DomError;
use crate::domain::ports::{DocumentPort, EventTargetPort, SchedulerPort};

/// Default debounce delay between a trigger and its check pass.
pub const DEFAULT_DELAY_MS: u64 = 200;

/// Events that trigger a check pass once the page is ready.
const WATCHED_EVENTS: [(EventTarget, EventKind); 3] = [
    (EventTarget::Document, EventKind::Scroll),
    (EventTarget::Window, EventKind::Resize),
    (EventTarget::Window, EventKind::OrientationChange),
];

/// Configuration for the lazy image loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Class marking images awaiting deferred loading.
    #[serde(default = "default_marker_class")]
    pub marker_class: String,

    /// Attribute holding the deferred source URL.
    #[serde(default = "default_source_attribute")]
    pub source_attribute: String,

    /// Delay between a trigger and the check pass, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_marker_class() -> String {
    DEFAULT_MARKER_CLASS.to_string()
}

fn default_source_attribute() -> String {
    DEFAULT_SOURCE_ATTRIBUTE.to_string()
}

const fn default_delay_ms() -> u64 {
    DEFAULT_DELAY_MS
}

impl LoaderConfig {
    /// Returns the debounce delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            marker_class: default_marker_class(),
            source_attribute: default_source_attribute(),
            delay_ms: DEFAULT_DELAY_MS,
        }
    }
}

/// Ports the loader talks to.
#[derive(Clone)]
pub struct LoaderPorts {
    /// Element access.
    pub document: Arc<dyn DocumentPort>,
    /// Listener registration.
    pub events: Arc<dyn EventTargetPort>,
    /// Deferred execution.
    pub scheduler: Arc<dyn SchedulerPort>,
}

impl LoaderPorts {
    /// Bundles the three ports.
    #[must_use]
    pub fn new(
        document: Arc<dyn DocumentPort>,
        events: Arc<dyn EventTargetPort>,
        scheduler: Arc<dyn SchedulerPort>,
    ) -> Self {
        Self {
            document,
            events,
            scheduler,
        }
    }
}

/// Lifecycle of a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderPhase {
    /// Waiting for the page-ready signal.
    #[default]
    Installed,
    /// Listeners attached, candidates pending.
    Watching,
    /// Every candidate resolved; listeners detached for good.
    Finished,
}

/// What happened to a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// A check pass was scheduled.
    Scheduled,
    /// A pass is already pending; the trigger was discarded.
    Dropped,
    /// The loader is not watching (not ready yet, or finished).
    Inactive,
}

/// Result of one check pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Candidates promoted during this pass, in document order.
    pub resolved: Vec<ElementId>,
    /// Candidates dropped because they left the document.
    ///
    /// Their source and class are left untouched. A browser would report an
    /// empty box for a detached node and promote it instead.
    pub discarded: Vec<ElementId>,
    /// Candidates still pending afterwards.
    pub remaining: usize,
    /// True if this pass emptied the set and detached the listeners.
    pub detached: bool,
}

#[derive(Default)]
struct LoaderState {
    phase: LoaderPhase,
    candidates: CandidateSet,
    active: bool,
    ready_listener: Option<ListenerId>,
    listeners: Vec<ListenerId>,
    passes: usize,
    dropped: usize,
    last_pass: Option<PassReport>,
}

struct Inner {
    ports: LoaderPorts,
    config: LoaderConfig,
    state: Mutex<LoaderState>,
}

/// Lazy image loader bound to one page.
///
/// Cloning yields another handle to the same loader.
#[derive(Clone)]
pub struct LazyImageLoader {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for LazyImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("LazyImageLoader")
            .field("config", &self.inner.config)
            .field("phase", &state.phase)
            .field("pending", &state.candidates.len())
            .field("active", &state.active)
            .finish_non_exhaustive()
    }
}

impl LazyImageLoader {
    /// Installs a loader on a page.
    ///
    /// Registers for the page-ready signal; everything else happens from there.
    #[must_use]
    pub fn install(ports: LoaderPorts, config: LoaderConfig) -> Self {
        let loader = Self {
            inner: Arc::new(Inner {
                ports,
                config,
                state: Mutex::new(LoaderState::default()),
            }),
        };

        let weak = Arc::downgrade(&loader.inner);
        let ready_listener = loader.inner.ports.events.add_listener(
            EventTarget::Document,
            EventKind::DomContentLoaded,
            Arc::new(move |_: EventKind| {
                if let Some(loader) = Self::upgrade(&weak) {
                    loader.on_ready();
                }
            }),
        );
        loader.inner.state.lock().ready_listener = Some(ready_listener);

        info!(
            marker = %loader.inner.config.marker_class,
            delay_ms = loader.inner.config.delay_ms,
            "Lazy image loader installed"
        );
        loader
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    fn on_ready(&self) {
        let ports = &self.inner.ports;
        let ids = ports.document.query_images(&self.inner.config.marker_class);

        let ready_listener = {
            let mut state = self.inner.state.lock();
            if state.phase != LoaderPhase::Installed {
                return;
            }
            state.candidates = CandidateSet::new(ids);
            state.phase = LoaderPhase::Watching;
            state.ready_listener.take()
        };

        if let Some(id) = ready_listener {
            ports.events.remove_listener(id);
        }

        let mut listeners = Vec::with_capacity(WATCHED_EVENTS.len());
        for (target, kind) in WATCHED_EVENTS {
            let weak = Arc::downgrade(&self.inner);
            listeners.push(ports.events.add_listener(
                target,
                kind,
                Arc::new(move |event: EventKind| {
                    if let Some(loader) = Self::upgrade(&weak) {
                        loader.request_pass(event);
                    }
                }),
            ));
        }

        let pending = {
            let mut state = self.inner.state.lock();
            state.listeners = listeners;
            state.candidates.len()
        };
        info!(candidates = pending, "Page ready, watching lazy images");

        self.request_pass(EventKind::DomContentLoaded);
    }

    /// Requests a check pass in response to `trigger`.
    ///
    /// Schedules a pass after the configured delay unless one is already
    /// pending, in which case the trigger is discarded.
    pub fn request_pass(&self, trigger: EventKind) -> TriggerOutcome {
        {
            let mut state = self.inner.state.lock();
            if state.phase != LoaderPhase::Watching {
                trace!(%trigger, phase = ?state.phase, "Trigger ignored");
                return TriggerOutcome::Inactive;
            }
            if state.active {
                state.dropped += 1;
                trace!(%trigger, "Pass already pending, trigger dropped");
                return TriggerOutcome::Dropped;
            }
            state.active = true;
        }

        let weak = Arc::downgrade(&self.inner);
        self.inner.ports.scheduler.schedule_once(
            self.inner.config.delay(),
            Box::new(move || {
                if let Some(loader) = Self::upgrade(&weak) {
                    loader.run_pass();
                }
            }),
        );
        trace!(%trigger, "Check pass scheduled");
        TriggerOutcome::Scheduled
    }

    /// Evaluates every pending candidate and promotes the visible ones.
    ///
    /// Only the scheduled task runs this; it clears the pending flag
    /// whatever the outcome.
    fn run_pass(&self) {
        let ports = &self.inner.ports;
        let config = &self.inner.config;
        let candidates = self.inner.state.lock().candidates.ids().to_vec();
        let viewport_height = ports.document.viewport_height();

        let mut resolved = Vec::new();
        let mut discarded = Vec::new();

        for id in candidates {
            let candidate = match ports.document.candidate(&id, &config.source_attribute) {
                Ok(candidate) => candidate,
                Err(e) => {
                    warn!(id = %id, error = %e, "Dropping lazy image candidate");
                    self.inner.state.lock().candidates.remove(&id);
                    discarded.push(id);
                    continue;
                }
            };

            if !candidate.is_visible(viewport_height) {
                trace!(
                    id = %id,
                    top = candidate.bounds.top,
                    display = %candidate.display,
                    "Candidate not visible"
                );
                continue;
            }

            // Marker removal and set removal happen under one lock.
            let promoted = {
                let mut state = self.inner.state.lock();
                let promoted = self.promote(&candidate);
                state.candidates.remove(&id);
                promoted
            };
            match promoted {
                Ok(()) => resolved.push(id),
                Err(e) => {
                    warn!(id = %id, error = %e, "Dropping lazy image candidate");
                    discarded.push(id);
                }
            }
        }

        let (report, listeners) = {
            let mut state = self.inner.state.lock();
            state.passes += 1;

            let detached = state.phase == LoaderPhase::Watching && state.candidates.is_empty();
            let listeners = if detached {
                state.phase = LoaderPhase::Finished;
                std::mem::take(&mut state.listeners)
            } else {
                Vec::new()
            };
            state.active = false;

            let report = PassReport {
                resolved,
                discarded,
                remaining: state.candidates.len(),
                detached,
            };
            state.last_pass = Some(report.clone());
            (report, listeners)
        };

        for id in listeners {
            ports.events.remove_listener(id);
        }

        debug!(
            resolved = report.resolved.len(),
            discarded = report.discarded.len(),
            remaining = report.remaining,
            detached = report.detached,
            "Check pass complete"
        );
        if report.detached {
            info!("All lazy images loaded, listeners detached");
        }
    }

    fn promote(&self, candidate: &CandidateImage) -> Result<(), DomError> {
        let document = &self.inner.ports.document;
        document.set_source(&candidate.id, candidate.pending_source.clone())?;
        document.remove_class(&candidate.id, &self.inner.config.marker_class)?;
        debug!(id = %candidate.id, src = ?candidate.pending_source, "Lazy image resolved");
        Ok(())
    }

    /// Returns the loader configuration.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.inner.config
    }

    /// Returns the current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> LoaderPhase {
        self.inner.state.lock().phase
    }

    /// Returns true while a check pass is pending.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.state.lock().active
    }

    /// Returns the ids still awaiting resolution.
    #[must_use]
    pub fn pending(&self) -> Vec<ElementId> {
        self.inner.state.lock().candidates.ids().to_vec()
    }

    /// Returns the number of completed check passes.
    #[must_use]
    pub fn passes(&self) -> usize {
        self.inner.state.lock().passes
    }

    /// Returns the report of the most recent check pass.
    #[must_use]
    pub fn last_pass(&self) -> Option<PassReport> {
        self.inner.state.lock().last_pass.clone()
    }

    /// Returns the number of triggers dropped while a pass was pending.
    #[must_use]
    pub fn dropped_triggers(&self) -> usize {
        self.inner.state.lock().dropped
    }
}
