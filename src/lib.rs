//! flowlint - Integration-flow XML linter
//!
//! A fast static analyzer for Mule-style integration-flow XML
//! configuration. It scans a project (or a single file), runs a set of
//! structural rules over each parsed document, derives technical metrics
//! with A-E ratings, and evaluates quality gates for CI enforcement.
//!
//! # Architecture
//!
//! ```text
//! CLI -> LintEngine -> FlowDocument -> Rules -> LintReport -> QualityGate
//! ```
//!
//! The engine resolves the project root, discovers flow files, runs the
//! per-file rule pass (in parallel by default) and the project-scope pass,
//! then assembles an immutable report that formatters and the quality-gate
//! evaluator consume.

pub mod config;
pub mod context;
pub mod document;
pub mod engine;
pub mod issue;
pub mod metrics;
pub mod output;
pub mod quality_gate;
pub mod query;
pub mod report;
pub mod rule;
pub mod rules;

// Re-export main types
pub use config::{Config, ConfigError};
pub use context::{RuleConfig, ValidationContext};
pub use document::{FlowDocument, FlowNode, NodeId, ParseError};
pub use engine::{LintEngine, ScanError, PARSE_ERROR_RULE_ID, PROJECT_MARKERS};
pub use issue::{Issue, IssueType, Severity};
pub use metrics::{ProjectMetrics, Rating};
pub use output::{CsvFormatter, HtmlFormatter, JsonFormatter, OutputFormatter, SarifFormatter, TextFormatter};
pub use quality_gate::{
    evaluate, GateStatus, Operator, QualityCondition, QualityGate, QualityGateResult,
};
pub use report::{FileResult, LintReport, LintSummary};
pub use rule::{Rule, RuleCategory, RuleScope};
pub use rules::builtin_rules;
