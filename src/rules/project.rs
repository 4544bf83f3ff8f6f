//! Project-scope rules
//!
//! These run once per scan against the project root rather than per file.
//! The orchestrator calls `reset` before each scan so a long-lived engine
//! can be reused.

use crate::context::ValidationContext;
use crate::document::FlowDocument;
use crate::issue::{Issue, IssueType, Severity};
use crate::rule::{file_issue, Rule, RuleCategory, RuleScope};
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

/// Projects must carry a mule-artifact.json descriptor
#[derive(Default)]
pub struct ProjectMissingDescriptor {
    // Roots already reported, so repeated passes over the same engine
    // instance stay quiet until reset
    warned: Mutex<HashSet<PathBuf>>,
}

impl Rule for ProjectMissingDescriptor {
    fn id(&self) -> &'static str {
        "project-missing-descriptor"
    }

    fn name(&self) -> &'static str {
        "Missing application descriptor"
    }

    fn description(&self) -> &'static str {
        "Deployable applications need a mule-artifact.json at the project root"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn issue_type(&self) -> IssueType {
        IssueType::CodeSmell
    }

    fn scope(&self) -> RuleScope {
        RuleScope::ProjectWide
    }

    fn validate(&self, _document: &FlowDocument, context: &ValidationContext) -> Vec<Issue> {
        if context.project_root.join("mule-artifact.json").is_file() {
            return Vec::new();
        }
        let mut warned = self.warned.lock().unwrap_or_else(|e| e.into_inner());
        if !warned.insert(context.project_root.clone()) {
            return Vec::new();
        }
        vec![file_issue(self, "Project has no mule-artifact.json")
            .with_suggestion("Add a mule-artifact.json describing the application")]
    }

    fn reset(&self) {
        self.warned
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Projects must have the standard source layout
pub struct ProjectMissingSourceLayout;

impl Rule for ProjectMissingSourceLayout {
    fn id(&self) -> &'static str {
        "project-missing-source-layout"
    }

    fn name(&self) -> &'static str {
        "Missing source layout"
    }

    fn description(&self) -> &'static str {
        "The build expects flow files under src/main/mule"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Structure
    }

    fn issue_type(&self) -> IssueType {
        IssueType::CodeSmell
    }

    fn scope(&self) -> RuleScope {
        RuleScope::ProjectWide
    }

    fn validate(&self, _document: &FlowDocument, context: &ValidationContext) -> Vec<Issue> {
        if context.project_root.join("src/main/mule").is_dir() {
            return Vec::new();
        }
        vec![file_issue(self, "Project has no src/main/mule directory")
            .with_suggestion("Create src/main/mule and move flow files there")]
    }
}
