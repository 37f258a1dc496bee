//! Infrastructure layer with port adapters, configuration, and file loading.

/// Application configuration.
pub mod config;
/// Page and scenario file loading.
pub mod fixtures;
/// In-memory page implementing the document and event ports.
pub mod page;
/// Timer adapters.
pub mod scheduler;

pub use config::{AppConfig, CliArgs, ConfigError, ConfigStore, LogLevel, PageConfig};
pub use fixtures::{FixtureError, load_page, load_scenario};
pub use page::{HeadlessPage, PageElement, parse_html};
pub use scheduler::{ManualScheduler, SchedulerError, TokioScheduler};
