//! Built-in rules
//!
//! Each rule is a simple pattern check over the parsed document tree; the
//! orchestrator decides which rules run, isolates their failures and applies
//! severity overrides.

pub mod documentation;
pub mod error_handling;
pub mod naming;
pub mod performance;
pub mod project;
pub mod security;
pub mod structure;

use crate::rule::Rule;

/// All built-in rules, in stable registration order
pub fn builtin_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(naming::FlowNameConvention),
        Box::new(naming::SubFlowNameConvention),
        Box::new(error_handling::FlowMissingErrorHandler),
        Box::new(error_handling::ErrorHandlerEmpty),
        Box::new(security::HardcodedCredentials),
        Box::new(security::InsecureEndpoint),
        Box::new(security::MissingTls),
        Box::new(performance::PayloadLogging),
        Box::new(documentation::FlowDescription),
        Box::new(structure::FileLocation),
        Box::new(structure::MaxFlowsPerFile),
        Box::new(project::ProjectMissingDescriptor::default()),
        Box::new(project::ProjectMissingSourceLayout),
    ]
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_rule_ids_are_unique() {
        let rules = builtin_rules();
        let ids: HashSet<_> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_every_category_is_represented() {
        use crate::rule::RuleCategory::*;
        let rules = builtin_rules();
        for category in [
            Naming,
            ErrorHandling,
            Security,
            Performance,
            Documentation,
            Structure,
        ] {
            assert!(
                rules.iter().any(|r| r.category() == category),
                "no rule for {}",
                category
            );
        }
    }

    #[test]
    fn test_project_rules_exist() {
        use crate::rule::RuleScope;
        let rules = builtin_rules();
        assert!(rules.iter().any(|r| r.scope() == RuleScope::ProjectWide));
    }
}
