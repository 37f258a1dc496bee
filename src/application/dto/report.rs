//! Simulation report.

use serde::Serialize;

use crate::application::services::LoaderPhase;
use crate::domain::entities::ElementId;
use crate::infrastructure::page::PageElement;

/// What became of one lazy image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageOutcome {
    /// Element id.
    pub id: ElementId,
    /// Deferred source as declared in the markup.
    pub pending_source: Option<String>,
    /// Active source at the end of the run.
    pub src: Option<String>,
    /// Virtual time of resolution, if it happened.
    pub resolved_at_ms: Option<u64>,
}

impl ImageOutcome {
    /// Returns true if the image was promoted.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        self.resolved_at_ms.is_some()
    }
}

/// Result of replaying a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Virtual time at the end of the run.
    pub elapsed_ms: u64,
    /// Completed check passes.
    pub passes: usize,
    /// Triggers discarded because a pass was pending.
    pub dropped_triggers: usize,
    /// Loader phase at the end of the run.
    pub phase: LoaderPhase,
    /// Per-candidate outcome in document order.
    pub images: Vec<ImageOutcome>,
    /// Final state of every element.
    pub elements: Vec<PageElement>,
}

impl SimulationReport {
    /// Number of resolved candidates.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.images.iter().filter(|i| i.is_resolved()).count()
    }

    /// Number of candidates still pending.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.images.len() - self.resolved_count()
    }

    /// Returns true once the loader detached its listeners.
    #[must_use]
    pub fn listeners_detached(&self) -> bool {
        self.phase == LoaderPhase::Finished
    }

    /// Outcome for one element.
    #[must_use]
    pub fn image(&self, id: &str) -> Option<&ImageOutcome> {
        self.images.iter().find(|i| i.id.as_str() == id)
    }
}
