//! Error-handling rules

use crate::context::ValidationContext;
use crate::document::FlowDocument;
use crate::issue::{Issue, IssueType, Severity};
use crate::rule::{node_issue, Rule, RuleCategory};

/// Flows should declare an error handler
pub struct FlowMissingErrorHandler;

impl Rule for FlowMissingErrorHandler {
    fn id(&self) -> &'static str {
        "flow-missing-error-handler"
    }

    fn name(&self) -> &'static str {
        "Flow missing error handler"
    }

    fn description(&self) -> &'static str {
        "Flows without an error handler fall through to the runtime default, \
         losing the chance to log or compensate"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::ErrorHandling
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Bug
    }

    fn validate(&self, document: &FlowDocument, _context: &ValidationContext) -> Vec<Issue> {
        document
            .select_all("//flow")
            .into_iter()
            .filter(|flow| {
                !document
                    .children_of(flow)
                    .any(|child| child.local_name == "error-handler")
            })
            .map(|flow| {
                let name = flow.attribute("name").unwrap_or("(anonymous)");
                node_issue(
                    self,
                    document,
                    flow,
                    &format!("Flow '{}' has no error handler", name),
                )
                .with_suggestion(
                    "Add an <error-handler> block or reference a shared global handler",
                )
            })
            .collect()
    }
}

/// Error handlers must contain at least one on-error block
pub struct ErrorHandlerEmpty;

impl Rule for ErrorHandlerEmpty {
    fn id(&self) -> &'static str {
        "error-handler-empty"
    }

    fn name(&self) -> &'static str {
        "Empty error handler"
    }

    fn description(&self) -> &'static str {
        "An empty error handler silently swallows failures"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::ErrorHandling
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Bug
    }

    fn validate(&self, document: &FlowDocument, _context: &ValidationContext) -> Vec<Issue> {
        document
            .select_all("//error-handler")
            .into_iter()
            .filter(|handler| !document.children_of(handler).any(|c| c.is_element()))
            .map(|handler| {
                node_issue(self, document, handler, "Error handler is empty").with_suggestion(
                    "Add an <on-error-continue> or <on-error-propagate> block",
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{context, parse};

    #[test]
    fn test_flow_with_handler_passes() {
        let doc = parse(
            r#"<mule><flow name="a"><logger/><error-handler><on-error-propagate/></error-handler></flow></mule>"#,
        );
        assert!(FlowMissingErrorHandler.validate(&doc, &context()).is_empty());
    }

    #[test]
    fn test_flow_without_handler_flagged() {
        let doc = parse(r#"<mule><flow name="order-intake"><logger/></flow></mule>"#);
        let issues = FlowMissingErrorHandler.validate(&doc, &context());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("order-intake"));
    }

    #[test]
    fn test_subflows_not_required_to_handle_errors() {
        let doc = parse(r#"<mule><sub-flow name="helper"><logger/></sub-flow></mule>"#);
        assert!(FlowMissingErrorHandler.validate(&doc, &context()).is_empty());
    }

    #[test]
    fn test_empty_handler_flagged() {
        let doc = parse(r#"<mule><flow name="a"><error-handler/></flow></mule>"#);
        let issues = ErrorHandlerEmpty.validate(&doc, &context());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Error);
    }

    #[test]
    fn test_handler_with_comment_only_is_empty() {
        let doc = parse(
            r#"<mule><flow name="a"><error-handler><!-- todo --></error-handler></flow></mule>"#,
        );
        assert_eq!(ErrorHandlerEmpty.validate(&doc, &context()).len(), 1);
    }

    #[test]
    fn test_populated_handler_passes() {
        let doc = parse(
            r#"<mule><flow name="a"><error-handler><on-error-continue><logger/></on-error-continue></error-handler></flow></mule>"#,
        );
        assert!(ErrorHandlerEmpty.validate(&doc, &context()).is_empty());
    }
}
