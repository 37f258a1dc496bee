//! viewport-lazyload - A headless viewport-proximity image loader.
//!
//! Images marked for deferred loading get their real source once they
//! intersect the viewport. The loader talks to its host page through ports,
//! so it runs against the in-memory page shipped here as well as any other
//! DOM-like host.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

/// Application layer containing the loader service, use cases and DTOs.
pub mod application;
/// Domain layer containing entities, errors, and port definitions.
pub mod domain;
/// Infrastructure layer containing port adapters and configuration.
pub mod infrastructure;
/// Presentation layer rendering simulation reports.
pub mod presentation;

/// Current version of the application.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name.
pub const NAME: &str = "lazyload-sim";
