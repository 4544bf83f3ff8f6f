//! Standalone HTML report formatter

use super::OutputFormatter;
use crate::issue::Severity;
use crate::report::LintReport;

pub struct HtmlFormatter;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "info",
    }
}

impl OutputFormatter for HtmlFormatter {
    fn format(&self, report: &LintReport) -> String {
        let mut body = String::new();

        body.push_str(&format!(
            "<h1>Lint report</h1>\n<p>{} &mdash; {} files, {} issues ({} errors, {} warnings, {} infos)</p>\n",
            escape(&report.timestamp),
            report.summary.total_files,
            report.summary.total_issues(),
            report.error_count(),
            report.warning_count(),
            report.info_count()
        ));

        if let Some(metrics) = &report.metrics {
            if let (Some(c), Some(m), Some(r), Some(s)) = (
                &metrics.complexity,
                &metrics.maintainability,
                &metrics.reliability,
                &metrics.security,
            ) {
                body.push_str("<h2>Ratings</h2>\n<ul>\n");
                body.push_str(&format!(
                    "<li>Complexity: {} (average {})</li>\n",
                    c.rating, c.average
                ));
                body.push_str(&format!(
                    "<li>Maintainability: {} (debt ratio {}%)</li>\n",
                    m.rating, m.debt_ratio
                ));
                body.push_str(&format!(
                    "<li>Reliability: {} ({} bugs)</li>\n",
                    r.rating, r.bugs
                ));
                body.push_str(&format!(
                    "<li>Security: {} ({} vulnerabilities, {} hotspots)</li>\n",
                    s.rating, s.vulnerabilities, s.hotspots
                ));
                body.push_str("</ul>\n");
            }
        }

        body.push_str("<h2>Issues</h2>\n<table>\n<tr><th>File</th><th>Line</th><th>Severity</th><th>Rule</th><th>Message</th></tr>\n");
        for file in &report.files {
            for issue in &file.issues {
                body.push_str(&format!(
                    "<tr class=\"{}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                    severity_class(issue.severity),
                    escape(&file.relative_path),
                    issue.line,
                    issue.severity,
                    escape(&issue.rule_id),
                    escape(&issue.message)
                ));
            }
        }
        body.push_str("</table>\n");

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>Lint report</title>\n<style>\n\
             body {{ font-family: sans-serif; margin: 2em; }}\n\
             table {{ border-collapse: collapse; width: 100%; }}\n\
             th, td {{ border: 1px solid #ccc; padding: 4px 8px; text-align: left; }}\n\
             tr.error td {{ background: #fdd; }}\n\
             tr.warning td {{ background: #ffd; }}\n\
             tr.info td {{ background: #def; }}\n\
             </style>\n</head>\n<body>\n{}</body>\n</html>\n",
            body
        )
    }
}
