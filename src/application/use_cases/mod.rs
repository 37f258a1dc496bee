//! Use case implementations.

mod simulate_use_case;

pub use simulate_use_case::SimulateUseCase;
