//! Scenario replay use case.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::application::dto::{ImageOutcome, Scenario, SimulationReport, Step};
use crate::application::services::{LazyImageLoader, LoaderConfig, LoaderPorts};
use crate::domain::entities::{Display, ElementId};
use crate::domain::errors::SimulationError;
use crate::domain::ports::DocumentPort;
use crate::infrastructure::page::HeadlessPage;
use crate::infrastructure::scheduler::ManualScheduler;

/// Replays a scenario against a headless page on a virtual clock.
pub struct SimulateUseCase {
    config: LoaderConfig,
}

/// Per-run bookkeeping.
struct Run {
    page: Arc<HeadlessPage>,
    scheduler: Arc<ManualScheduler>,
    marker_class: String,
    candidates: Vec<ElementId>,
    pending_sources: HashMap<ElementId, Option<String>>,
    resolved_at: HashMap<ElementId, Duration>,
}

impl SimulateUseCase {
    /// Creates new use case.
    #[must_use]
    pub const fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    /// Installs a loader on `page`, fires page-ready, replays the steps,
    /// and lets one more delay elapse so the last pass settles.
    ///
    /// # Errors
    /// Returns error if a step references an element the page lacks.
    pub fn execute(
        &self,
        page: Arc<HeadlessPage>,
        scenario: &Scenario,
    ) -> Result<SimulationReport, SimulationError> {
        let scheduler = Arc::new(ManualScheduler::new());
        let loader = LazyImageLoader::install(
            LoaderPorts::new(page.clone(), page.clone(), scheduler.clone()),
            self.config.clone(),
        );

        let candidates = page.query_images(&self.config.marker_class);
        let pending_sources = candidates
            .iter()
            .map(|id| {
                let source = page
                    .attribute(id, &self.config.source_attribute)
                    .ok()
                    .flatten();
                (id.clone(), source)
            })
            .collect();

        let mut run = Run {
            page,
            scheduler,
            marker_class: self.config.marker_class.clone(),
            candidates,
            pending_sources,
            resolved_at: HashMap::new(),
        };

        info!(
            candidates = run.candidates.len(),
            steps = scenario.steps.len(),
            "Starting simulation"
        );
        run.page.fire_ready();

        for step in &scenario.steps {
            debug!(?step, at_ms = run.scheduler.now().as_millis(), "Applying step");
            run.apply(step)?;
        }
        run.settle(self.config.delay());

        Ok(run.report(&loader))
    }
}

impl Run {
    fn apply(&mut self, step: &Step) -> Result<(), SimulationError> {
        match step {
            Step::Wait(ms) => self.settle(Duration::from_millis(*ms)),
            Step::Scroll(y) => self.page.scroll_to(*y),
            Step::ScrollBy(dy) => self.page.scroll_by(*dy),
            Step::Resize(height) => self.page.resize(*height),
            Step::Rotate(height) => self.page.rotate(*height),
            Step::Show(id) => self.page.set_display(id, Display::Inline)?,
            Step::Hide(id) => self.page.set_display(id, Display::None)?,
        }
        Ok(())
    }

    /// Advances the clock by `by`, stopping at each due pass to timestamp
    /// whatever it resolved.
    fn settle(&mut self, by: Duration) {
        let target = self.scheduler.now() + by;
        while let Some(due) = self.scheduler.next_due().filter(|due| *due <= target) {
            self.scheduler.advance(due.saturating_sub(self.scheduler.now()));
            self.record_resolutions(due);
        }
        self.scheduler.advance(target.saturating_sub(self.scheduler.now()));
    }

    fn record_resolutions(&mut self, at: Duration) {
        for id in &self.candidates {
            if self.resolved_at.contains_key(id) {
                continue;
            }
            let resolved = self
                .page
                .element(id)
                .is_some_and(|e| !e.has_class(&self.marker_class));
            if resolved {
                self.resolved_at.insert(id.clone(), at);
            }
        }
    }

    fn report(self, loader: &LazyImageLoader) -> SimulationReport {
        let elements = self.page.snapshot();
        let images = self
            .candidates
            .iter()
            .map(|id| ImageOutcome {
                id: id.clone(),
                pending_source: self.pending_sources.get(id).cloned().flatten(),
                src: elements
                    .iter()
                    .find(|e| &e.id == id)
                    .and_then(|e| e.src.clone()),
                resolved_at_ms: self
                    .resolved_at
                    .get(id)
                    .map(|at| u64::try_from(at.as_millis()).unwrap_or(u64::MAX)),
            })
            .collect();

        SimulationReport {
            elapsed_ms: u64::try_from(self.scheduler.now().as_millis()).unwrap_or(u64::MAX),
            passes: loader.passes(),
            dropped_triggers: loader.dropped_triggers(),
            phase: loader.phase(),
            images,
            elements,
        }
    }
}
