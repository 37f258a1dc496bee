//! Presentation layer rendering simulation reports.

/// Text and JSON report rendering.
pub mod report;

pub use report::{ReportFormat, render};
