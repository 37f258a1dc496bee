//! Application configuration.

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::application::services::LoaderConfig;
use crate::infrastructure::page::DEFAULT_VIEWPORT_HEIGHT;
use crate::presentation::ReportFormat;

use super::args::CliArgs;

const APP_NAME: &str = "lazyload-sim";
const APP_QUALIFIER: &str = "dev";
const APP_ORGANIZATION: &str = "viewport-lazyload";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Log level configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warning level.
    #[default]
    Warn,
    /// Error level.
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Simulator configuration, from file and CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Log file path. Logs go to stderr when unset.
    #[serde(skip)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Report output format.
    #[serde(default)]
    pub format: ReportFormat,

    /// Loader configuration.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Page configuration.
    #[serde(default)]
    pub page: PageConfig,
}

/// Page configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageConfig {
    /// Viewport height in pixels.
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
}

const fn default_viewport_height() -> f64 {
    DEFAULT_VIEWPORT_HEIGHT
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            viewport_height: default_viewport_height(),
        }
    }
}

impl AppConfig {
    /// Merges CLI arguments into the configuration.
    pub fn merge_with_args(&mut self, args: &CliArgs) {
        if let Some(log_path) = &args.log_path {
            self.log_path = Some(log_path.clone());
        }
        if let Some(log_level) = args.log_level {
            self.log_level = log_level;
        }
        if let Some(format) = args.format {
            self.format = format;
        }
        if let Some(delay_ms) = args.delay_ms {
            self.loader.delay_ms = delay_ms;
        }
        if let Some(marker_class) = &args.marker_class {
            self.loader.marker_class.clone_from(marker_class);
        }
        if let Some(source_attribute) = &args.source_attribute {
            self.loader.source_attribute.clone_from(source_attribute);
        }
        if let Some(viewport_height) = args.viewport_height {
            self.page.viewport_height = viewport_height;
        }
    }

    /// Platform default location of the config file.
    #[must_use]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME)
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
