//! Loading pages and scenarios from disk.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::application::dto::Scenario;
use crate::infrastructure::page::{HeadlessPage, markup};

/// Errors raised while reading input files.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
    /// The scenario is not valid TOML or has unknown steps.
    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),
}

async fn read(path: &Path) -> Result<String, FixtureError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })
}

/// Reads an HTML file and lays it out as a headless page.
///
/// # Errors
/// Returns error if the file cannot be read.
pub async fn load_page(path: &Path, viewport_height: f64) -> Result<HeadlessPage, FixtureError> {
    let html = read(path).await?;
    debug!(path = %path.display(), bytes = html.len(), "Loaded page markup");
    Ok(markup::parse_html(&html, viewport_height))
}

/// Reads a TOML scenario file.
///
/// # Errors
/// Returns error if the file cannot be read or parsed.
pub async fn load_scenario(path: &Path) -> Result<Scenario, FixtureError> {
    let content = read(path).await?;
    let scenario = Scenario::from_toml(&content)?;
    debug!(path = %path.display(), steps = scenario.steps.len(), "Loaded scenario");
    Ok(scenario)
}
