//! Report rendering for the simulator output.

use std::fmt::Write;

use serde::{Deserialize, Serialize};

use crate::application::dto::{ImageOutcome, SimulationReport};

const ID_HEADER: &str = "IMAGE";
const RESOLVED_HEADER: &str = "RESOLVED";
const PENDING: &str = "pending";
const NO_SOURCE: &str = "-";

/// Output format of a simulation report.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human readable table.
    #[default]
    Text,
    /// Pretty-printed JSON of the full report.
    Json,
}

/// Renders `report` in the requested format.
///
/// # Errors
/// Returns error if JSON serialization fails.
pub fn render(report: &SimulationReport, format: ReportFormat) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => serde_json::to_string_pretty(report),
    }
}

fn resolved_column(image: &ImageOutcome) -> String {
    image
        .resolved_at_ms
        .map_or_else(|| PENDING.to_string(), |ms| format!("{ms} ms"))
}

fn render_text(report: &SimulationReport) -> String {
    let id_width = report
        .images
        .iter()
        .map(|i| i.id.as_str().len())
        .max()
        .unwrap_or_default()
        .max(ID_HEADER.len());
    let resolved_width = report
        .images
        .iter()
        .map(|i| resolved_column(i).len())
        .max()
        .unwrap_or_default()
        .max(RESOLVED_HEADER.len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "elapsed {} ms, {} passes, {} dropped triggers, loader {:?}",
        report.elapsed_ms,
        report.passes,
        report.dropped_triggers,
        report.phase
    );
    let _ = writeln!(
        out,
        "{} of {} lazy images loaded",
        report.resolved_count(),
        report.images.len()
    );

    if report.images.is_empty() {
        return out;
    }

    out.push('\n');
    let _ = writeln!(
        out,
        "{ID_HEADER:<id_width$}  {RESOLVED_HEADER:<resolved_width$}  SOURCE"
    );
    for image in &report.images {
        let source = image
            .src
            .as_deref()
            .or(image.pending_source.as_deref())
            .unwrap_or(NO_SOURCE);
        let _ = writeln!(
            out,
            "{:<id_width$}  {:<resolved_width$}  {source}",
            image.id.as_str(),
            resolved_column(image),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::LoaderPhase;
    use crate::domain::entities::ElementId;

    fn report() -> SimulationReport {
        SimulationReport {
            elapsed_ms: 700,
            passes: 2,
            dropped_triggers: 1,
            phase: LoaderPhase::Watching,
            images: vec![
                ImageOutcome {
                    id: ElementId::from("hero"),
                    pending_source: Some("/hero.jpg".to_string()),
                    src: Some("/hero.jpg".to_string()),
                    resolved_at_ms: Some(200),
                },
                ImageOutcome {
                    id: ElementId::from("footer-banner"),
                    pending_source: None,
                    src: None,
                    resolved_at_ms: None,
                },
            ],
            elements: Vec::new(),
        }
    }

    #[test]
    fn test_text_report() {
        let text = render(&report(), ReportFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "elapsed 700 ms, 2 passes, 1 dropped triggers, loader Watching"
        );
        assert_eq!(lines[1], "1 of 2 lazy images loaded");
        assert_eq!(lines[3], "IMAGE          RESOLVED  SOURCE");
        assert_eq!(lines[4], "hero           200 ms    /hero.jpg");
        assert_eq!(lines[5], "footer-banner  pending   -");
    }

    #[test]
    fn test_text_report_without_images() {
        let mut report = report();
        report.images.clear();

        let text = render(&report, ReportFormat::Text).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.contains("0 of 0 lazy images loaded"));
    }

    #[test]
    fn test_json_report() {
        let json = render(&report(), ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["phase"], "watching");
        assert_eq!(value["images"][0]["id"], "hero");
        assert_eq!(value["images"][0]["resolved_at_ms"], 200);
        assert!(value["images"][1]["src"].is_null());
    }

    #[test]
    fn test_format_names() {
        let format: ReportFormat = serde_json::from_str("\"json\"").unwrap();
        assert_eq!(format, ReportFormat::Json);
        assert_eq!(ReportFormat::default(), ReportFormat::Text);
    }
}
