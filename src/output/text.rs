//! Human-readable text output formatter

use super::OutputFormatter;
use crate::issue::{Issue, Severity};
use crate::report::LintReport;
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show code snippets
    pub show_source: bool,

    /// Show fix suggestions
    pub show_suggestions: bool,

    /// Show summary and metrics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_source: true,
            show_suggestions: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> String {
        let s = format!("{}", severity);
        if !self.colored {
            return s;
        }
        match severity {
            Severity::Error => s.red().bold().to_string(),
            Severity::Warning => s.yellow().bold().to_string(),
            Severity::Info => s.blue().to_string(),
        }
    }

    fn format_issue(&self, path: &str, issue: &Issue) -> String {
        let mut output = String::new();

        let location = match issue.column {
            Some(column) => format!("{}:{}:{}", path, issue.line, column),
            None => format!("{}:{}", path, issue.line),
        };
        output.push_str(&format!(
            "{}: {}[{}]: {}\n",
            location,
            self.severity_str(issue.severity),
            if self.colored {
                issue.rule_id.cyan().to_string()
            } else {
                issue.rule_id.clone()
            },
            issue.message
        ));

        if self.show_source {
            if let Some(snippet) = &issue.code_snippet {
                let line_num = format!("{:>4}", issue.line);
                output.push_str(&format!(
                    "{} {} {}\n",
                    if self.colored {
                        line_num.blue().to_string()
                    } else {
                        line_num
                    },
                    if self.colored {
                        "|".blue().to_string()
                    } else {
                        "|".to_string()
                    },
                    snippet
                ));
            }
        }

        if self.show_suggestions {
            if let Some(suggestion) = &issue.suggestion {
                output.push_str(&format!(
                    "   {} help: {}\n",
                    if self.colored {
                        "=".blue().to_string()
                    } else {
                        "=".to_string()
                    },
                    suggestion
                ));
            }
        }

        output
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &LintReport) -> String {
        let mut output = String::new();

        for file in &report.files {
            if file.issues.is_empty() {
                continue;
            }
            if self.colored {
                output.push_str(&format!("{}\n", file.relative_path.underline()));
            } else {
                output.push_str(&format!("{}\n", file.relative_path));
            }
            for issue in &file.issues {
                output.push_str(&self.format_issue(&file.relative_path, issue));
            }
            output.push('\n');
        }

        if self.show_stats {
            output.push_str(&format!(
                "{} {} scanned",
                report.summary.total_files,
                if report.summary.total_files == 1 {
                    "file"
                } else {
                    "files"
                }
            ));

            let mut counts = Vec::new();
            let errors = report.error_count();
            let warnings = report.warning_count();
            let infos = report.info_count();
            if errors > 0 {
                let s = format!("{} {}", errors, if errors == 1 { "error" } else { "errors" });
                counts.push(if self.colored { s.red().to_string() } else { s });
            }
            if warnings > 0 {
                let s = format!(
                    "{} {}",
                    warnings,
                    if warnings == 1 { "warning" } else { "warnings" }
                );
                counts.push(if self.colored {
                    s.yellow().to_string()
                } else {
                    s
                });
            }
            if infos > 0 {
                let s = format!("{} {}", infos, if infos == 1 { "info" } else { "infos" });
                counts.push(if self.colored { s.blue().to_string() } else { s });
            }
            if !counts.is_empty() {
                output.push_str(&format!(": {}", counts.join(", ")));
            }
            output.push('\n');

            if let Some(metrics) = &report.metrics {
                output.push_str(&format!(
                    "{} flows, {} sub-flows, {} connectors\n",
                    metrics.flow_count, metrics.sub_flow_count, metrics.connector_count
                ));
                if let (Some(c), Some(m), Some(r), Some(s)) = (
                    &metrics.complexity,
                    &metrics.maintainability,
                    &metrics.reliability,
                    &metrics.security,
                ) {
                    output.push_str(&format!(
                        "Ratings: complexity {} (avg {}), maintainability {} (debt {}%), reliability {} ({} bugs), security {} ({} vulns, {} hotspots)\n",
                        c.rating,
                        c.average,
                        m.rating,
                        m.debt_ratio,
                        r.rating,
                        r.bugs,
                        s.rating,
                        s.vulnerabilities,
                        s.hotspots
                    ));
                }
            }

            output.push_str(&format!(
                "Finished in {:.2}s\n",
                report.duration_ms as f64 / 1000.0
            ));
        }

        output
    }
}
