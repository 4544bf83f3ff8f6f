//! SARIF (Static Analysis Results Interchange Format) output formatter
//!
//! SARIF is a standard format for static analysis tools, supported by
//! GitHub Actions, Azure DevOps, and other CI/CD systems.

use super::OutputFormatter;
use crate::issue::Severity;
use crate::report::LintReport;
use serde::Serialize;

/// SARIF formatter for CI/CD integration
pub struct SarifFormatter {
    /// Tool name
    pub tool_name: String,

    /// Tool version
    pub tool_version: String,
}

impl Default for SarifFormatter {
    fn default() -> Self {
        Self {
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl SarifFormatter {
    pub fn new(tool_name: &str, tool_version: &str) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            tool_version: tool_version.to_string(),
        }
    }
}

#[derive(Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: &'static str,
    version: &'static str,
    runs: Vec<SarifRun>,
}

#[derive(Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Serialize)]
struct SarifDriver {
    name: String,
    version: String,
    rules: Vec<SarifRule>,
}

#[derive(Serialize)]
struct SarifRule {
    id: String,
    #[serde(rename = "shortDescription")]
    short_description: SarifMessage,
    #[serde(rename = "defaultConfiguration")]
    default_configuration: SarifConfiguration,
}

#[derive(Serialize)]
struct SarifConfiguration {
    level: &'static str,
}

#[derive(Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: &'static str,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
}

#[derive(Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
}

#[derive(Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
    region: SarifRegion,
}

#[derive(Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Serialize)]
struct SarifRegion {
    #[serde(rename = "startLine")]
    start_line: usize,
    #[serde(rename = "startColumn", skip_serializing_if = "Option::is_none")]
    start_column: Option<usize>,
}

fn severity_to_level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "note",
    }
}

impl OutputFormatter for SarifFormatter {
    fn format(&self, report: &LintReport) -> String {
        let mut rules_map = std::collections::BTreeMap::new();
        for file in &report.files {
            for issue in &file.issues {
                rules_map
                    .entry(issue.rule_id.clone())
                    .or_insert_with(|| SarifRule {
                        id: issue.rule_id.clone(),
                        short_description: SarifMessage {
                            text: issue.message.clone(),
                        },
                        default_configuration: SarifConfiguration {
                            level: severity_to_level(issue.severity),
                        },
                    });
            }
        }

        let results: Vec<SarifResult> = report
            .files
            .iter()
            .flat_map(|file| {
                file.issues.iter().map(|issue| SarifResult {
                    rule_id: issue.rule_id.clone(),
                    level: severity_to_level(issue.severity),
                    message: SarifMessage {
                        text: issue.message.clone(),
                    },
                    locations: vec![SarifLocation {
                        physical_location: SarifPhysicalLocation {
                            artifact_location: SarifArtifactLocation {
                                uri: file.relative_path.clone(),
                            },
                            region: SarifRegion {
                                start_line: issue.line,
                                start_column: issue.column,
                            },
                        },
                    }],
                })
            })
            .collect();

        let sarif = SarifReport {
            schema: "https://raw.githubusercontent.com/oasis-tcs/sarif-spec/master/Schemata/sarif-schema-2.1.0.json",
            version: "2.1.0",
            runs: vec![SarifRun {
                tool: SarifTool {
                    driver: SarifDriver {
                        name: self.tool_name.clone(),
                        version: self.tool_version.clone(),
                        rules: rules_map.into_values().collect(),
                    },
                },
                results,
            }],
        };

        serde_json::to_string_pretty(&sarif).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Issue;
    use crate::report::{FileResult, LintSummary};
    use std::path::PathBuf;

    #[test]
    fn test_sarif_format() {
        let files = vec![FileResult::parsed(
            PathBuf::from("/proj/src/main/mule/app.xml"),
            "src/main/mule/app.xml".to_string(),
            vec![Issue::new(
                "security-hardcoded-credentials",
                Severity::Error,
                "Hardcoded password",
                10,
            )
            .with_column(5)],
        )];
        let report = LintReport {
            project_root: PathBuf::from("/proj"),
            timestamp: "2026-01-01T00:00:00+00:00".to_string(),
            duration_ms: 1,
            summary: LintSummary::from_files(&files),
            files,
            metrics: None,
        };

        let output = SarifFormatter::new("flowlint", "0.1.0").format(&report);
        assert!(output.contains("sarif-schema-2.1.0.json"));
        assert!(output.contains("\"version\": \"2.1.0\""));
        assert!(output.contains("security-hardcoded-credentials"));
        assert!(output.contains("\"level\": \"error\""));
        assert!(output.contains("\"startLine\": 10"));
        assert!(output.contains("src/main/mule/app.xml"));
    }

    #[test]
    fn test_sarif_severity_mapping() {
        assert_eq!(severity_to_level(Severity::Error), "error");
        assert_eq!(severity_to_level(Severity::Warning), "warning");
        assert_eq!(severity_to_level(Severity::Info), "note");
    }
}
