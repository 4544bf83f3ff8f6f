//! Project structure rules (per-file)
//!
//! These only make sense inside a recognized project, so the orchestrator
//! skips the whole category in standalone-file scans.

use crate::context::ValidationContext;
use crate::document::FlowDocument;
use crate::issue::{Issue, IssueType, Severity};
use crate::rule::{file_issue, node_issue, Rule, RuleCategory};

const MULE_SOURCE_DIR: &str = "src/main/mule";

/// Flow files belong under src/main/mule
pub struct FileLocation;

impl Rule for FileLocation {
    fn id(&self) -> &'static str {
        "structure-file-location"
    }

    fn name(&self) -> &'static str {
        "Flow file location"
    }

    fn description(&self) -> &'static str {
        "Flow files outside src/main/mule are not packaged into the deployable archive"
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

    fn validate(&self, document: &FlowDocument, context: &ValidationContext) -> Vec<Issue> {
        // Only files that actually define flows need to live in the source dir
        if !document.exists("//flow") && !document.exists("//sub-flow") {
            return Vec::new();
        }
        let normalized = context.relative_path.replace('\\', "/");
        if normalized.starts_with(MULE_SOURCE_DIR) {
            return Vec::new();
        }
        vec![file_issue(
            self,
            &format!(
                "Flow file '{}' is outside {}",
                context.relative_path, MULE_SOURCE_DIR
            ),
        )
        .with_suggestion(&format!("Move the file under {}", MULE_SOURCE_DIR))]
    }
}

/// Cap the number of flows defined in one file
pub struct MaxFlowsPerFile;

impl Rule for MaxFlowsPerFile {
    fn id(&self) -> &'static str {
        "structure-max-flows-per-file"
    }

    fn name(&self) -> &'static str {
        "Too many flows per file"
    }

    fn description(&self) -> &'static str {
        "Files holding many flows become merge hotspots and are hard to review"
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

    fn validate(&self, document: &FlowDocument, context: &ValidationContext) -> Vec<Issue> {
        let max: usize = context.option("max", 3);
        let flows = document.select_all("//flow");
        if flows.len() <= max {
            return Vec::new();
        }
        // Report at the first flow over the limit
        let over = flows[max];
        vec![node_issue(
            self,
            document,
            over,
            &format!("File defines {} flows (limit {})", flows.len(), max),
        )
        .with_suggestion("Split the file by business capability")]
    }
}
