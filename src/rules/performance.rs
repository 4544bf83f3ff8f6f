//! Performance rules

use crate::context::ValidationContext;
use crate::document::FlowDocument;
use crate::issue::{Issue, IssueType, Severity};
use crate::rule::{node_issue, Rule, RuleCategory};

/// Loggers that serialize the whole payload
pub struct PayloadLogging;

impl Rule for PayloadLogging {
    fn id(&self) -> &'static str {
        "perf-payload-logging"
    }

    fn name(&self) -> &'static str {
        "Full payload logging"
    }

    fn description(&self) -> &'static str {
        "Logging the entire payload forces serialization of potentially large \
         messages and can leak sensitive data into logs"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Performance
    }

    fn issue_type(&self) -> IssueType {
        IssueType::CodeSmell
    }

    fn validate(&self, document: &FlowDocument, _context: &ValidationContext) -> Vec<Issue> {
        document
            .select_all("//logger")
            .into_iter()
            .filter(|logger| {
                logger
                    .attribute("message")
                    .map(|m| m.contains("#[payload]") || m.contains("#[message.payload]"))
                    .unwrap_or(false)
            })
            .map(|logger| {
                node_issue(self, document, logger, "Logger writes the full payload")
                    .with_suggestion(
                        "Log a correlation id or a summary expression instead of #[payload]",
                    )
            })
            .collect()
    }
}
