//! Lint report assembly
//!
//! The JSON shape of [`LintReport`] is the canonical exchange format
//! consumed by every formatter and by the quality-gate evaluator; field
//! names are a stable contract.

use crate::issue::{Issue, Severity};
use crate::metrics::ProjectMetrics;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Relative path used for the virtual project-scope result
pub const PROJECT_RESULT_NAME: &str = "Project Structure";

/// Result of linting one file (or the virtual project-scope result)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResult {
    /// Absolute file path
    pub file_path: PathBuf,

    /// Path relative to the project root, with forward slashes
    pub relative_path: String,

    /// Issues found in this file
    pub issues: Vec<Issue>,

    /// Whether the file parsed successfully
    pub parsed: bool,

    /// Parser message when `parsed` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_error: Option<String>,
}

impl FileResult {
    /// Result for a successfully parsed file
    pub fn parsed(file_path: PathBuf, relative_path: String, issues: Vec<Issue>) -> Self {
        Self {
            file_path,
            relative_path,
            issues,
            parsed: true,
            parse_error: None,
        }
    }

    /// Result for a file that failed to parse
    pub fn parse_failed(
        file_path: PathBuf,
        relative_path: String,
        issue: Issue,
        error: String,
    ) -> Self {
        Self {
            file_path,
            relative_path,
            issues: vec![issue],
            parsed: false,
            parse_error: Some(error),
        }
    }

    /// Check if this is the virtual project-scope result
    pub fn is_project_result(&self) -> bool {
        self.relative_path == PROJECT_RESULT_NAME
    }
}

/// Aggregate counts derived by folding over all file results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintSummary {
    /// Number of file results (including the virtual project result)
    pub total_files: usize,

    /// Files carrying at least one issue
    pub files_with_issues: usize,

    /// Files that failed to parse
    pub parse_errors: usize,

    /// Issue counts per severity
    pub by_severity: BTreeMap<Severity, usize>,

    /// Issue counts per rule ID
    pub by_rule: BTreeMap<String, usize>,
}

impl LintSummary {
    /// Fold a summary over file results
    pub fn from_files(files: &[FileResult]) -> Self {
        let mut summary = Self {
            total_files: files.len(),
            ..Self::default()
        };

        for file in files {
            if !file.parsed {
                summary.parse_errors += 1;
            }
            if !file.issues.is_empty() {
                summary.files_with_issues += 1;
            }
            for issue in &file.issues {
                *summary.by_severity.entry(issue.severity).or_default() += 1;
                *summary.by_rule.entry(issue.rule_id.clone()).or_default() += 1;
            }
        }

        summary
    }

    /// Count of issues at a given severity
    pub fn severity_count(&self, severity: Severity) -> usize {
        self.by_severity.get(&severity).copied().unwrap_or(0)
    }

    /// Total number of issues across all files
    pub fn total_issues(&self) -> usize {
        self.by_severity.values().sum()
    }
}

/// The structured report produced by one scan invocation
///
/// Built exactly once per scan; immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LintReport {
    /// Resolved project root
    pub project_root: PathBuf,

    /// RFC 3339 timestamp of report assembly
    pub timestamp: String,

    /// Wall-clock duration of the scan in milliseconds
    pub duration_ms: u64,

    /// Per-file results in discovery order, plus at most one virtual result
    pub files: Vec<FileResult>,

    /// Derived counts
    pub summary: LintSummary,

    /// Raw structural counts and derived ratings; absent when the scan
    /// collected no metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<ProjectMetrics>,
}

impl LintReport {
    /// Iterate over every issue in the report
    pub fn all_issues(&self) -> impl Iterator<Item = &Issue> {
        self.files.iter().flat_map(|f| f.issues.iter())
    }

    /// Total error count
    pub fn error_count(&self) -> usize {
        self.summary.severity_count(Severity::Error)
    }

    /// Total warning count
    pub fn warning_count(&self) -> usize {
        self.summary.severity_count(Severity::Warning)
    }

    /// Total info count
    pub fn info_count(&self) -> usize {
        self.summary.severity_count(Severity::Info)
    }

    /// Check if the report is clean (no errors or warnings)
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0 && self.warning_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(rule_id: &str, severity: Severity) -> Issue {
        Issue::new(rule_id, severity, "msg", 1)
    }

    fn file(path: &str, issues: Vec<Issue>, parsed: bool) -> FileResult {
        FileResult {
            file_path: PathBuf::from(path),
            relative_path: path.to_string(),
            issues,
            parsed,
            parse_error: if parsed { None } else { Some("bad".into()) },
        }
    }

    #[test]
    fn test_summary_counts() {
        let files = vec![
            file(
                "a.xml",
                vec![
                    issue("rule-a", Severity::Error),
                    issue("rule-b", Severity::Warning),
                ],
                true,
            ),
            file("b.xml", vec![], true),
            file("c.xml", vec![issue("PARSE-ERROR", Severity::Error)], false),
        ];

        let summary = LintSummary::from_files(&files);
        assert_eq!(summary.total_files, 3);
        assert_eq!(summary.files_with_issues, 2);
        assert_eq!(summary.parse_errors, 1);
        assert_eq!(summary.severity_count(Severity::Error), 2);
        assert_eq!(summary.severity_count(Severity::Warning), 1);
        assert_eq!(summary.by_rule.get("rule-a"), Some(&1));
    }

    #[test]
    fn test_summary_invariant_by_severity_equals_issue_total() {
        let files = vec![
            file("a.xml", vec![issue("r1", Severity::Error)], true),
            file(
                "b.xml",
                vec![issue("r2", Severity::Info), issue("r2", Severity::Info)],
                true,
            ),
        ];
        let summary = LintSummary::from_files(&files);
        let issue_total: usize = files.iter().map(|f| f.issues.len()).sum();
        assert_eq!(summary.total_issues(), issue_total);
    }

    #[test]
    fn test_parse_errors_match_unparsed_files() {
        let files = vec![
            file("a.xml", vec![], true),
            file("b.xml", vec![issue("PARSE-ERROR", Severity::Error)], false),
            file("c.xml", vec![issue("PARSE-ERROR", Severity::Error)], false),
        ];
        let summary = LintSummary::from_files(&files);
        let unparsed = files.iter().filter(|f| !f.parsed).count();
        assert_eq!(summary.parse_errors, unparsed);
    }

    #[test]
    fn test_report_json_contract() {
        let report = LintReport {
            project_root: PathBuf::from("/proj"),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            duration_ms: 42,
            files: vec![file("a.xml", vec![issue("r", Severity::Warning)], true)],
            summary: LintSummary::from_files(&[file(
                "a.xml",
                vec![issue("r", Severity::Warning)],
                true,
            )]),
            metrics: None,
        };

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"projectRoot\""));
        assert!(json.contains("\"durationMs\":42"));
        assert!(json.contains("\"totalFiles\":1"));
        assert!(json.contains("\"bySeverity\""));
        assert!(json.contains("\"relativePath\":\"a.xml\""));
        // Absent metrics are omitted entirely
        assert!(!json.contains("\"metrics\""));
    }
}
