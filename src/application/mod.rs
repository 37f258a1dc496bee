//! Application layer with the loader service, use cases, and DTOs.

/// Data transfer objects.
pub mod dto;
/// Services.
pub mod services;
/// Use case implementations.
pub mod use_cases;

pub use dto::{ImageOutcome, Scenario, SimulationReport, Step};
pub use services::{LazyImageLoader, LoaderConfig, LoaderPorts};
pub use use_cases::SimulateUseCase;
