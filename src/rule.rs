//! Rule contract

use crate::context::ValidationContext;
use crate::document::{FlowDocument, FlowNode};
use crate::issue::{Issue, IssueType, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    /// Naming conventions for flows and sub-flows
    #[default]
    Naming,
    /// Error-handler presence and shape
    ErrorHandling,
    /// Credentials, transport security
    Security,
    /// Patterns with runtime cost
    Performance,
    /// Missing descriptions and annotations
    Documentation,
    /// Project layout conventions; meaningless without a known project root
    Structure,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Naming => write!(f, "naming"),
            RuleCategory::ErrorHandling => write!(f, "error-handling"),
            RuleCategory::Security => write!(f, "security"),
            RuleCategory::Performance => write!(f, "performance"),
            RuleCategory::Documentation => write!(f, "documentation"),
            RuleCategory::Structure => write!(f, "structure"),
        }
    }
}

impl std::str::FromStr for RuleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "naming" => Ok(RuleCategory::Naming),
            "error-handling" | "errorhandling" => Ok(RuleCategory::ErrorHandling),
            "security" => Ok(RuleCategory::Security),
            "performance" | "perf" => Ok(RuleCategory::Performance),
            "documentation" | "docs" => Ok(RuleCategory::Documentation),
            "structure" => Ok(RuleCategory::Structure),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

/// Where a rule runs during a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RuleScope {
    /// Runs once per discovered document
    #[default]
    PerFile,
    /// Runs exactly once per scan, after all files, against the project root
    ProjectWide,
}

/// The contract every check implements
///
/// `validate` must be a pure function of the document, the context and the
/// process-wide rule configuration: no panics for recoverable conditions
/// (missing elements, absent files), an empty Vec instead of any sentinel,
/// and read-only side effects at most. Rules are stateless across
/// invocations except project-wide rules that need once-per-project
/// semantics; those implement `reset`, which the orchestrator calls once at
/// the start of every project pass.
pub trait Rule: Send + Sync {
    /// Unique rule identifier (e.g. "flow-name-convention")
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    /// What the rule checks and why
    fn description(&self) -> &'static str;

    /// Severity stamped on issues unless overridden by configuration
    fn default_severity(&self) -> Severity;

    /// Rule category
    fn category(&self) -> RuleCategory;

    /// Metric classification of this rule's issues
    fn issue_type(&self) -> IssueType;

    /// Per-file or project-wide
    fn scope(&self) -> RuleScope {
        RuleScope::PerFile
    }

    /// Validate a document, returning all violations found
    fn validate(&self, document: &FlowDocument, context: &ValidationContext) -> Vec<Issue>;

    /// Clear any once-per-project state
    fn reset(&self) {}
}

/// Build an issue anchored to an offending node, deriving line, column and
/// snippet from the node's provenance
pub fn node_issue(
    rule: &dyn Rule,
    document: &FlowDocument,
    node: &FlowNode,
    message: &str,
) -> Issue {
    let mut issue = Issue::new(rule.id(), rule.default_severity(), message, node.line)
        .with_column(node.column);
    if let Some(line) = document.source_line(node.line) {
        issue = issue.with_snippet(line.trim_end());
    }
    issue
}

/// Build a file-level issue with no specific node; defaults to line 1
pub fn file_issue(rule: &dyn Rule, message: &str) -> Issue {
    Issue::new(rule.id(), rule.default_severity(), message, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct DummyRule;

    impl Rule for DummyRule {
        fn id(&self) -> &'static str {
            "dummy-rule"
        }
        fn name(&self) -> &'static str {
            "Dummy"
        }
        fn description(&self) -> &'static str {
            "Flags every flow"
        }
        fn default_severity(&self) -> Severity {
            Severity::Info
        }
        fn category(&self) -> RuleCategory {
            RuleCategory::Naming
        }
        fn issue_type(&self) -> IssueType {
            IssueType::CodeSmell
        }
        fn validate(&self, document: &FlowDocument, _context: &ValidationContext) -> Vec<Issue> {
            document
                .select_all("//flow")
                .iter()
                .map(|n| node_issue(self, document, n, "flagged"))
                .collect()
        }
    }

    #[test]
    fn test_default_scope_is_per_file() {
        assert_eq!(DummyRule.scope(), RuleScope::PerFile);
    }

    #[test]
    fn test_node_issue_provenance() {
        let content = "<mule>\n  <flow name=\"a\"/>\n</mule>";
        let doc = FlowDocument::parse(content, Path::new("t.xml")).unwrap();
        let ctx = ValidationContext {
            file_path: Path::new("t.xml").to_path_buf(),
            relative_path: "t.xml".to_string(),
            project_root: Path::new(".").to_path_buf(),
            rule_config: Default::default(),
        };

        let issues = DummyRule.validate(&doc, &ctx);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 2);
        assert_eq!(issues[0].rule_id, "dummy-rule");
        assert_eq!(issues[0].severity, Severity::Info);
        assert_eq!(issues[0].code_snippet.as_deref(), Some("  <flow name=\"a\"/>"));
    }

    #[test]
    fn test_file_issue_defaults_to_line_one() {
        let issue = file_issue(&DummyRule, "file-level problem");
        assert_eq!(issue.line, 1);
        assert!(issue.column.is_none());
    }

    #[test]
    fn test_category_round_trip() {
        assert_eq!(
            "error-handling".parse::<RuleCategory>().unwrap(),
            RuleCategory::ErrorHandling
        );
        assert_eq!(RuleCategory::Structure.to_string(), "structure");
        assert!("bogus".parse::<RuleCategory>().is_err());
    }
}
