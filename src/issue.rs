//! Issue types for lint results

use serde::{Deserialize, Serialize};

/// Severity level for issues
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,
    /// Warning - potential issue
    #[default]
    Warning,
    /// Error - definite problem
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" | "hint" | "note" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(()),
        }
    }
}

/// How an issue is classified for technical-metric purposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    /// Definite defect in flow logic
    Bug,
    /// Exploitable weakness
    Vulnerability,
    /// Maintainability problem
    #[default]
    CodeSmell,
}

impl std::fmt::Display for IssueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueType::Bug => write!(f, "bug"),
            IssueType::Vulnerability => write!(f, "vulnerability"),
            IssueType::CodeSmell => write!(f, "code-smell"),
        }
    }
}

/// A single rule violation
///
/// Immutable once produced, except for the orchestrator's severity-override
/// post-processing step. Identity is structural; duplicates from distinct
/// rules are valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Line number (1-based); file-level issues use line 1
    pub line: usize,

    /// Column number (1-based), when the offending node provides one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,

    /// Human-readable message
    pub message: String,

    /// Rule ID that produced this issue
    pub rule_id: String,

    /// Severity level
    pub severity: Severity,

    /// Remediation hint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// The offending source line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
}

impl Issue {
    /// Create a new issue
    pub fn new(rule_id: &str, severity: Severity, message: &str, line: usize) -> Self {
        Self {
            line,
            column: None,
            message: message.to_string(),
            rule_id: rule_id.to_string(),
            severity,
            suggestion: None,
            code_snippet: None,
        }
    }

    /// Set the column
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    /// Add a remediation hint
    pub fn with_suggestion(mut self, suggestion: &str) -> Self {
        self.suggestion = Some(suggestion.to_string());
        self
    }

    /// Attach the offending source line
    pub fn with_snippet(mut self, snippet: &str) -> Self {
        self.code_snippet = Some(snippet.to_string());
        self
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Check if this is a warning
    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("warn".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("hint".parse::<Severity>(), Ok(Severity::Info));
        assert!("bogus".parse::<Severity>().is_err());
    }

    #[test]
    fn test_issue_creation() {
        let issue = Issue::new("flow-name-convention", Severity::Warning, "Bad name", 12)
            .with_column(5)
            .with_suggestion("Rename the flow to kebab-case")
            .with_snippet("<flow name=\"MyFlow\">");

        assert_eq!(issue.line, 12);
        assert_eq!(issue.column, Some(5));
        assert!(issue.is_warning());
        assert!(issue.suggestion.is_some());
        assert!(issue.code_snippet.is_some());
    }

    #[test]
    fn test_issue_json_field_names() {
        let issue = Issue::new("test-rule", Severity::Error, "msg", 3).with_snippet("<flow/>");
        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("\"ruleId\":\"test-rule\""));
        assert!(json.contains("\"codeSnippet\""));
        assert!(json.contains("\"severity\":\"error\""));
        // Absent optionals are omitted from the contract
        assert!(!json.contains("suggestion"));
    }
}
