//! Documentation rules

use crate::context::ValidationContext;
use crate::document::FlowDocument;
use crate::issue::{Issue, IssueType, Severity};
use crate::rule::{node_issue, Rule, RuleCategory};

/// Flows should carry a description
pub struct FlowDescription;

impl Rule for FlowDescription {
    fn id(&self) -> &'static str {
        "doc-flow-description"
    }

    fn name(&self) -> &'static str {
        "Flow description"
    }

    fn description(&self) -> &'static str {
        "Undocumented flows are hard to navigate for anyone who did not write them"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Documentation
    }

    fn issue_type(&self) -> IssueType {
        IssueType::CodeSmell
    }

    fn validate(&self, document: &FlowDocument, _context: &ValidationContext) -> Vec<Issue> {
        document
            .select_all("//flow")
            .into_iter()
            .filter(|flow| {
                flow.attribute_local("description").is_none()
                    && !document
                        .children_of(flow)
                        .any(|c| c.local_name == "description")
            })
            .map(|flow| {
                let name = flow.attribute("name").unwrap_or("(anonymous)");
                node_issue(
                    self,
                    document,
                    flow,
                    &format!("Flow '{}' has no description", name),
                )
                .with_suggestion("Add a doc:description attribute stating what the flow does")
            })
            .collect()
    }
}
