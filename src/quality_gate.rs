//! Quality-gate threshold evaluation
//!
//! A gate is pure configuration: a named ordered list of metric threshold
//! conditions. Evaluation is a pure function of a frozen report and a gate;
//! results are computed on demand and never cached.

use crate::metrics::classify_issues;
use crate::report::LintReport;
use serde::{Deserialize, Serialize};

/// Comparison operator for a condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = "<=")]
    LessOrEqual,
    #[serde(rename = ">=")]
    GreaterOrEqual,
    #[serde(rename = "=")]
    Equal,
}

impl Operator {
    /// Evaluate `actual OP threshold`
    pub fn compare(&self, actual: f64, threshold: f64) -> bool {
        match self {
            Operator::LessThan => actual < threshold,
            Operator::GreaterThan => actual > threshold,
            Operator::LessOrEqual => actual <= threshold,
            Operator::GreaterOrEqual => actual >= threshold,
            Operator::Equal => (actual - threshold).abs() < f64::EPSILON,
        }
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::LessThan => write!(f, "<"),
            Operator::GreaterThan => write!(f, ">"),
            Operator::LessOrEqual => write!(f, "<="),
            Operator::GreaterOrEqual => write!(f, ">="),
            Operator::Equal => write!(f, "="),
        }
    }
}

/// What a violated condition does to the overall verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionStatus {
    Fail,
    Warn,
}

/// One metric threshold condition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityCondition {
    /// Metric name (e.g. "errors", "complexity_max")
    pub metric: String,
    pub operator: Operator,
    pub threshold: f64,
    /// Escalation when the condition is violated
    pub status: ConditionStatus,
}

impl QualityCondition {
    pub fn new(metric: &str, operator: Operator, threshold: f64, status: ConditionStatus) -> Self {
        Self {
            metric: metric.to_string(),
            operator,
            threshold,
            status,
        }
    }
}

/// A named, immutable, reusable set of conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGate {
    pub name: String,
    pub conditions: Vec<QualityCondition>,
}

impl QualityGate {
    /// Built-in "Default" gate
    pub fn default_gate() -> Self {
        Self {
            name: "Default".to_string(),
            conditions: vec![
                QualityCondition::new("errors", Operator::GreaterThan, 0.0, ConditionStatus::Fail),
                QualityCondition::new(
                    "warnings",
                    Operator::GreaterThan,
                    10.0,
                    ConditionStatus::Warn,
                ),
                QualityCondition::new(
                    "complexity_max",
                    Operator::GreaterThan,
                    20.0,
                    ConditionStatus::Fail,
                ),
                QualityCondition::new(
                    "security_hotspots",
                    Operator::GreaterThan,
                    0.0,
                    ConditionStatus::Warn,
                ),
            ],
        }
    }

    /// Built-in "Strict" gate
    pub fn strict() -> Self {
        Self {
            name: "Strict".to_string(),
            conditions: vec![
                QualityCondition::new("errors", Operator::GreaterThan, 0.0, ConditionStatus::Fail),
                QualityCondition::new(
                    "warnings",
                    Operator::GreaterThan,
                    0.0,
                    ConditionStatus::Fail,
                ),
                QualityCondition::new(
                    "complexity_max",
                    Operator::GreaterThan,
                    10.0,
                    ConditionStatus::Fail,
                ),
                QualityCondition::new(
                    "security_hotspots",
                    Operator::GreaterThan,
                    0.0,
                    ConditionStatus::Fail,
                ),
            ],
        }
    }

    /// Look up a built-in gate by name (case-insensitive)
    pub fn builtin(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_gate()),
            "strict" => Some(Self::strict()),
            _ => None,
        }
    }
}

/// Overall gate verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateStatus {
    Passed,
    Warning,
    Failed,
}

impl std::fmt::Display for GateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GateStatus::Passed => write!(f, "passed"),
            GateStatus::Warning => write!(f, "warning"),
            GateStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One evaluated condition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionResult {
    #[serde(flatten)]
    pub condition: QualityCondition,
    /// Extracted metric value (missing metrics default to 0)
    pub actual: f64,
    pub violated: bool,
}

/// Result of one gate evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityGateResult {
    pub gate: QualityGate,
    pub status: GateStatus,
    pub conditions: Vec<ConditionResult>,
    pub message: String,
}

impl QualityGateResult {
    /// Process exit code for this verdict: passed 0, failed 1, warning 0
    /// unless the fail-on-warning flag is set
    pub fn exit_code(&self, fail_on_warning: bool) -> i32 {
        match self.status {
            GateStatus::Passed => 0,
            GateStatus::Failed => 1,
            GateStatus::Warning => {
                if fail_on_warning {
                    1
                } else {
                    0
                }
            }
        }
    }
}

/// Extract the current value of a named metric from a report
///
/// Unknown or absent metrics default to 0.
pub fn metric_value(report: &LintReport, metric: &str) -> f64 {
    let (bugs, vulnerabilities, code_smells, hotspots) = classify_issues(report.all_issues());

    match metric {
        "errors" => report.error_count() as f64,
        "warnings" => report.warning_count() as f64,
        "infos" => report.info_count() as f64,
        "parse_errors" => report.summary.parse_errors as f64,
        "files_with_issues" => report.summary.files_with_issues as f64,
        "total_files" => report.summary.total_files as f64,
        "total_issues" => report.summary.total_issues() as f64,
        "bugs" => bugs as f64,
        "vulnerabilities" => vulnerabilities as f64,
        "code_smells" => code_smells as f64,
        "security_hotspots" => hotspots as f64,
        "complexity_max" => report
            .metrics
            .as_ref()
            .map(|m| m.max_complexity() as f64)
            .unwrap_or(0.0),
        "complexity_avg" => report
            .metrics
            .as_ref()
            .map(|m| m.average_complexity())
            .unwrap_or(0.0),
        "debt_ratio" => report
            .metrics
            .as_ref()
            .and_then(|m| m.maintainability.as_ref())
            .map(|m| m.debt_ratio)
            .unwrap_or(0.0),
        _ => 0.0,
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Evaluate a gate against a frozen report
///
/// Failed strictly dominates warning, which dominates passed; condition
/// order affects only the composed message text.
pub fn evaluate(report: &LintReport, gate: &QualityGate) -> QualityGateResult {
    let mut status = GateStatus::Passed;
    let mut conditions = Vec::with_capacity(gate.conditions.len());
    let mut violations: Vec<String> = Vec::new();

    for condition in &gate.conditions {
        let actual = metric_value(report, &condition.metric);
        let violated = condition.operator.compare(actual, condition.threshold);

        if violated {
            violations.push(format!(
                "{} {} {} (actual: {})",
                condition.metric,
                condition.operator,
                format_value(condition.threshold),
                format_value(actual)
            ));
            match condition.status {
                ConditionStatus::Fail => status = GateStatus::Failed,
                ConditionStatus::Warn => {
                    if status != GateStatus::Failed {
                        status = GateStatus::Warning;
                    }
                }
            }
        }

        conditions.push(ConditionResult {
            condition: condition.clone(),
            actual,
            violated,
        });
    }

    let message = match status {
        GateStatus::Passed => format!("Quality gate '{}' passed", gate.name),
        GateStatus::Warning => format!(
            "Quality gate '{}' warning: {}",
            gate.name,
            violations.join("; ")
        ),
        GateStatus::Failed => format!(
            "Quality gate '{}' failed: {}",
            gate.name,
            violations.join("; ")
        ),
    };

    QualityGateResult {
        gate: gate.clone(),
        status,
        conditions,
        message,
    }
}
