//! JSON output formatter
//!
//! Serializes the report as-is; the report's serde shape is the canonical
//! exchange format.

use super::OutputFormatter;
use crate::report::LintReport;

pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &LintReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_default()
    }
}
