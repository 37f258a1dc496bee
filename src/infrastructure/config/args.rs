use super::app_config::LogLevel;
use crate::presentation::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments of the simulator.
#[derive(Debug, Parser)]
#[command(
    name = "lazyload-sim",
    version,
    about = "Replays a scroll scenario against a page and reports which lazy images load",
    long_about = None
)]
pub struct CliArgs {
    /// HTML page to load.
    #[arg(value_name = "PAGE")]
    pub page: PathBuf,

    /// Scenario file (TOML). Without one, only the initial pass runs.
    #[arg(short, long, value_name = "PATH")]
    pub scenario: Option<PathBuf>,

    /// Report format.
    #[arg(short, long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Configuration file path.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH")]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Delay between a trigger and its check pass, in milliseconds.
    #[arg(long, env = "LAZYLOAD_DELAY_MS")]
    pub delay_ms: Option<u64>,

    /// Class marking lazy images.
    #[arg(long)]
    pub marker_class: Option<String>,

    /// Attribute holding the deferred source.
    #[arg(long)]
    pub source_attribute: Option<String>,

    /// Viewport height in pixels.
    #[arg(long)]
    pub viewport_height: Option<f64>,
}
