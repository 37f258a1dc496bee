//! Domain error types.

mod dom_error;
mod simulation_error;

pub use dom_error::DomError;
pub use simulation_error::SimulationError;
