//! CSV output formatter

use super::OutputFormatter;
use crate::report::LintReport;

pub struct CsvFormatter;

fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

impl OutputFormatter for CsvFormatter {
    fn format(&self, report: &LintReport) -> String {
        let mut output = String::from("file,line,column,severity,rule,message\n");
        for file in &report.files {
            for issue in &file.issues {
                output.push_str(&format!(
                    "{},{},{},{},{},{}\n",
                    escape(&file.relative_path),
                    issue.line,
                    issue.column.map(|c| c.to_string()).unwrap_or_default(),
                    issue.severity,
                    escape(&issue.rule_id),
                    escape(&issue.message)
                ));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::{Issue, Severity};
    use crate::report::{FileResult, LintSummary};
    use std::path::PathBuf;

    #[test]
    fn test_csv_format() {
        let files = vec![FileResult::parsed(
            PathBuf::from("/proj/a.xml"),
            "a.xml".to_string(),
            vec![Issue::new("rule-x", Severity::Warning, "message, with comma", 2)],
        )];
        let report = LintReport {
            project_root: PathBuf::from("/proj"),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            duration_ms: 1,
            summary: LintSummary::from_files(&files),
            files,
            metrics: None,
        };

        let output = CsvFormatter.format(&report);
        let mut lines = output.lines();
        assert_eq!(lines.next(), Some("file,line,column,severity,rule,message"));
        assert_eq!(
            lines.next(),
            Some("a.xml,2,,warning,rule-x,\"message, with comma\"")
        );
    }

    #[test]
    fn test_escape_quotes() {
        assert_eq!(escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape("plain"), "plain");
    }
}
