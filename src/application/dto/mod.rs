//! Data transfer objects.

mod report;
mod scenario;

pub use report::{ImageOutcome, SimulationReport};
pub use scenario::{Scenario, Step};
