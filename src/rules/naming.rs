//! Naming convention rules

use crate::context::ValidationContext;
use crate::document::FlowDocument;
use crate::issue::{Issue, IssueType, Severity};
use crate::rule::{node_issue, Rule, RuleCategory};
use regex::Regex;

const DEFAULT_NAME_PATTERN: &str = "^[a-z][a-z0-9]*(-[a-z0-9]+)*$";

fn compile_pattern(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        log::warn!("invalid naming pattern '{}' ({}); using default", pattern, e);
        Regex::new(DEFAULT_NAME_PATTERN).expect("default pattern is valid")
    })
}

fn check_names(
    rule: &dyn Rule,
    document: &FlowDocument,
    context: &ValidationContext,
    path: &str,
    kind: &str,
) -> Vec<Issue> {
    let pattern: String = context.option("pattern", DEFAULT_NAME_PATTERN.to_string());
    let re = compile_pattern(&pattern);

    document
        .select_all(path)
        .into_iter()
        .filter_map(|node| {
            let name = node.attribute("name")?;
            if re.is_match(name) {
                return None;
            }
            Some(
                node_issue(
                    rule,
                    document,
                    node,
                    &format!("{} name '{}' does not match pattern '{}'", kind, name, pattern),
                )
                .with_suggestion(&format!("Rename the {} to match '{}'", kind, pattern)),
            )
        })
        .collect()
}

/// Flows must follow the configured naming pattern (kebab-case by default)
pub struct FlowNameConvention;

impl Rule for FlowNameConvention {
    fn id(&self) -> &'static str {
        "flow-name-convention"
    }

    fn name(&self) -> &'static str {
        "Flow naming convention"
    }

    fn description(&self) -> &'static str {
        "Flow names should follow a consistent pattern so entry points are easy to locate"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Naming
    }

    fn issue_type(&self) -> IssueType {
        IssueType::CodeSmell
    }

    fn validate(&self, document: &FlowDocument, context: &ValidationContext) -> Vec<Issue> {
        check_names(self, document, context, "//flow", "Flow")
    }
}

/// Sub-flows must follow the configured naming pattern
pub struct SubFlowNameConvention;

impl Rule for SubFlowNameConvention {
    fn id(&self) -> &'static str {
        "subflow-name-convention"
    }

    fn name(&self) -> &'static str {
        "Sub-flow naming convention"
    }

    fn description(&self) -> &'static str {
        "Sub-flow names should follow a consistent pattern"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Naming
    }

    fn issue_type(&self) -> IssueType {
        IssueType::CodeSmell
    }

    fn validate(&self, document: &FlowDocument, context: &ValidationContext) -> Vec<Issue> {
        check_names(self, document, context, "//sub-flow", "Sub-flow")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{context, context_with_option, parse};

    #[test]
    fn test_kebab_case_passes() {
        let doc = parse(r#"<mule><flow name="order-intake"/><flow name="ship"/></mule>"#);
        assert!(FlowNameConvention.validate(&doc, &context()).is_empty());
    }

    #[test]
    fn test_camel_case_flagged() {
        let doc = parse(r#"<mule><flow name="OrderIntake"/></mule>"#);
        let issues = FlowNameConvention.validate(&doc, &context());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].rule_id, "flow-name-convention");
        assert!(issues[0].message.contains("OrderIntake"));
        assert!(issues[0].suggestion.is_some());
    }

    #[test]
    fn test_custom_pattern_option() {
        let doc = parse(r#"<mule><flow name="order_intake"/></mule>"#);
        let ctx = context_with_option("pattern", serde_yaml::Value::from("^[a-z_]+$"));
        assert!(FlowNameConvention.validate(&doc, &ctx).is_empty());
    }

    #[test]
    fn test_invalid_pattern_falls_back_without_panicking() {
        let doc = parse(r#"<mule><flow name="order-intake"/></mule>"#);
        let ctx = context_with_option("pattern", serde_yaml::Value::from("([unclosed"));
        // Falls back to the default pattern, which this name satisfies
        assert!(FlowNameConvention.validate(&doc, &ctx).is_empty());
    }

    #[test]
    fn test_unnamed_flow_ignored() {
        let doc = parse(r#"<mule><flow/></mule>"#);
        assert!(FlowNameConvention.validate(&doc, &context()).is_empty());
    }

    #[test]
    fn test_subflow_rule_only_checks_subflows() {
        let doc = parse(r#"<mule><flow name="BadName"/><sub-flow name="AlsoBad"/></mule>"#);
        let issues = SubFlowNameConvention.validate(&doc, &context());
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("AlsoBad"));
    }
}
