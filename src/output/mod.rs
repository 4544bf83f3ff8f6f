//! Output formatters for lint reports

mod csv;
mod html;
mod json;
mod sarif;
mod text;

pub use csv::CsvFormatter;
pub use html::HtmlFormatter;
pub use json::JsonFormatter;
pub use sarif::SarifFormatter;
pub use text::TextFormatter;

use crate::report::LintReport;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire lint report
    fn format(&self, report: &LintReport) -> String;
}

/// Look up a formatter by name
pub fn create(format: &str, colored: bool) -> Option<Box<dyn OutputFormatter>> {
    match format {
        "text" => {
            let formatter = if colored {
                TextFormatter::new()
            } else {
                TextFormatter::new().without_color()
            };
            Some(Box::new(formatter))
        }
        "json" => Some(Box::new(JsonFormatter)),
        "sarif" => Some(Box::new(SarifFormatter::default())),
        "csv" => Some(Box::new(CsvFormatter)),
        "html" => Some(Box::new(HtmlFormatter)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_known_formats() {
        for format in ["text", "json", "sarif", "csv", "html"] {
            assert!(create(format, false).is_some(), "no formatter for {}", format);
        }
        assert!(create("xml", false).is_none());
    }
}
