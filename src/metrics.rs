//! Technical-metric collection and rating aggregation
//!
//! Raw structural counts accumulate additively during the scan pass, one
//! delta per file; `aggregate` then freezes them into four derived rating
//! blocks. Every rating function is a monotonic step function over a single
//! numeric input with inclusive upper band bounds.

use crate::document::{FlowDocument, FlowNode};
use crate::issue::Issue;
use crate::report::FileResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A–E technical rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rating {
    A,
    B,
    C,
    D,
    E,
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::A => write!(f, "A"),
            Rating::B => write!(f, "B"),
            Rating::C => write!(f, "C"),
            Rating::D => write!(f, "D"),
            Rating::E => write!(f, "E"),
        }
    }
}

/// Metric classification of an issue, by rule-ID prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueKind {
    Bug,
    Vulnerability,
    CodeSmell,
    SecurityHotspot,
}

// Ordered prefix-pattern lists, checked vulnerability -> hotspot -> bug;
// anything unmatched is a code smell. A rule ID lands in exactly one bucket.
const VULNERABILITY_PREFIXES: &[&str] = &["security-hardcoded", "security-insecure"];
const HOTSPOT_PREFIXES: &[&str] = &["security-"];
const BUG_PREFIXES: &[&str] = &["flow-missing-", "error-", "PARSE-ERROR"];

/// Classify a rule ID into exactly one metric bucket
pub fn classify_rule_id(rule_id: &str) -> IssueKind {
    if VULNERABILITY_PREFIXES.iter().any(|p| rule_id.starts_with(p)) {
        IssueKind::Vulnerability
    } else if HOTSPOT_PREFIXES.iter().any(|p| rule_id.starts_with(p)) {
        IssueKind::SecurityHotspot
    } else if BUG_PREFIXES.iter().any(|p| rule_id.starts_with(p)) {
        IssueKind::Bug
    } else {
        IssueKind::CodeSmell
    }
}

/// Complexity rating from the average per-flow complexity
pub fn complexity_rating(average: f64) -> Rating {
    if average <= 5.0 {
        Rating::A
    } else if average <= 10.0 {
        Rating::B
    } else if average <= 15.0 {
        Rating::C
    } else if average <= 20.0 {
        Rating::D
    } else {
        Rating::E
    }
}

/// Maintainability rating from the technical-debt ratio (%)
pub fn maintainability_rating(debt_ratio: f64) -> Rating {
    if debt_ratio <= 5.0 {
        Rating::A
    } else if debt_ratio <= 10.0 {
        Rating::B
    } else if debt_ratio <= 20.0 {
        Rating::C
    } else if debt_ratio <= 50.0 {
        Rating::D
    } else {
        Rating::E
    }
}

/// Reliability rating from the bug count
pub fn reliability_rating(bugs: usize) -> Rating {
    match bugs {
        0 => Rating::A,
        1..=2 => Rating::B,
        3..=5 => Rating::C,
        6..=10 => Rating::D,
        _ => Rating::E,
    }
}

/// Security rating from the vulnerability count; hotspots do not rate
pub fn security_rating(vulnerabilities: usize) -> Rating {
    match vulnerabilities {
        0 => Rating::A,
        1 => Rating::B,
        2..=3 => Rating::C,
        4..=5 => Rating::D,
        _ => Rating::E,
    }
}

/// Complexity sample for one flow or sub-flow
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowComplexity {
    /// Flow name, or "(anonymous)" when unnamed
    pub name: String,
    /// Relative path of the defining file
    pub file: String,
    /// Complexity value (1 + decision points)
    pub value: usize,
}

/// Derived complexity block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityBlock {
    pub average: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_flow: Option<String>,
    pub highest_value: usize,
    pub rating: Rating,
}

/// Derived maintainability block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintainabilityBlock {
    pub code_smells: usize,
    pub debt_minutes: usize,
    pub dev_minutes: usize,
    pub debt_ratio: f64,
    pub rating: Rating,
}

/// Derived reliability block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReliabilityBlock {
    pub bugs: usize,
    pub rating: Rating,
}

/// Derived security block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityBlock {
    pub vulnerabilities: usize,
    pub hotspots: usize,
    pub rating: Rating,
}

/// Raw structural counts plus, after aggregation, four rating blocks
///
/// Accumulates mutably during the scan (one merged delta per file), then is
/// frozen and enriched exactly once at report assembly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetrics {
    pub flow_count: usize,
    pub sub_flow_count: usize,
    pub transform_count: usize,
    pub connector_count: usize,
    pub listener_count: usize,

    /// One sample per flow/sub-flow
    pub flow_complexities: Vec<FlowComplexity>,

    /// Summed complexity per file (relative path)
    pub complexity_by_file: BTreeMap<String, usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintainability: Option<MaintainabilityBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reliability: Option<ReliabilityBlock>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<SecurityBlock>,
}

// Elements that open an execution branch inside a flow
const DECISION_ELEMENTS: &[&str] = &[
    "choice",
    "when",
    "otherwise",
    "foreach",
    "parallel-foreach",
    "until-successful",
    "round-robin",
    "first-successful",
    "scatter-gather",
    "async",
    "try",
];

const TRANSFORM_ELEMENTS: &[&str] = &["transform", "transform-message"];
const LISTENER_ELEMENTS: &[&str] = &["listener", "scheduler"];

// Namespace prefixes that never denote connector operations
const CORE_PREFIXES: &[&str] = &["doc", "ee", "xsi", "spring", "xs", "secure-properties"];

fn is_connector_operation(node: &FlowNode) -> bool {
    let Some(prefix) = node.prefix.as_deref() else {
        return false;
    };
    if CORE_PREFIXES.contains(&prefix) {
        return false;
    }
    if LISTENER_ELEMENTS.contains(&node.local_name.as_str()) {
        return false;
    }
    // Configuration elements describe connections, not message processing
    !node.local_name.ends_with("-config")
        && !node.local_name.ends_with("-connection")
        && node.local_name != "config"
}

fn flow_complexity(document: &FlowDocument, flow: &FlowNode) -> usize {
    1 + document
        .descendants_of(flow)
        .iter()
        .filter(|n| n.is_element() && DECISION_ELEMENTS.contains(&n.local_name.as_str()))
        .count()
}

impl ProjectMetrics {
    /// Collect the structural counts of one parsed document
    pub fn collect(document: &FlowDocument, relative_path: &str) -> Self {
        let mut metrics = Self::default();

        for node in document.iter().filter(|n| n.is_element()) {
            match node.local_name.as_str() {
                "flow" => {
                    metrics.flow_count += 1;
                    metrics.record_complexity(document, node, relative_path);
                }
                "sub-flow" => {
                    metrics.sub_flow_count += 1;
                    metrics.record_complexity(document, node, relative_path);
                }
                local if TRANSFORM_ELEMENTS.contains(&local) => {
                    metrics.transform_count += 1;
                }
                local if LISTENER_ELEMENTS.contains(&local) => {
                    metrics.listener_count += 1;
                }
                _ if is_connector_operation(node) => {
                    metrics.connector_count += 1;
                }
                _ => {}
            }
        }

        metrics
    }

    fn record_complexity(&mut self, document: &FlowDocument, flow: &FlowNode, file: &str) {
        let value = flow_complexity(document, flow);
        let name = flow
            .attribute("name")
            .unwrap_or("(anonymous)")
            .to_string();
        self.flow_complexities.push(FlowComplexity {
            name,
            file: file.to_string(),
            value,
        });
        *self.complexity_by_file.entry(file.to_string()).or_default() += value;
    }

    /// Merge another delta into this accumulator; commutative and
    /// associative, so per-file result ordering does not affect the outcome
    pub fn merge(&mut self, other: ProjectMetrics) {
        self.flow_count += other.flow_count;
        self.sub_flow_count += other.sub_flow_count;
        self.transform_count += other.transform_count;
        self.connector_count += other.connector_count;
        self.listener_count += other.listener_count;
        self.flow_complexities.extend(other.flow_complexities);
        for (file, value) in other.complexity_by_file {
            *self.complexity_by_file.entry(file).or_default() += value;
        }
    }

    /// Check whether the scan collected anything at all
    pub fn is_empty(&self) -> bool {
        self.flow_count == 0
            && self.sub_flow_count == 0
            && self.transform_count == 0
            && self.connector_count == 0
            && self.listener_count == 0
            && self.flow_complexities.is_empty()
    }

    /// Freeze the raw counts into the four derived rating blocks
    pub fn aggregate(&mut self, files: &[FileResult]) {
        let mut bugs = 0usize;
        let mut vulnerabilities = 0usize;
        let mut code_smells = 0usize;
        let mut hotspots = 0usize;

        for issue in files.iter().flat_map(|f| f.issues.iter()) {
            match classify_rule_id(&issue.rule_id) {
                IssueKind::Bug => bugs += 1,
                IssueKind::Vulnerability => vulnerabilities += 1,
                IssueKind::CodeSmell => code_smells += 1,
                IssueKind::SecurityHotspot => hotspots += 1,
            }
        }

        let average = if self.flow_complexities.is_empty() {
            0.0
        } else {
            let total: usize = self.flow_complexities.iter().map(|f| f.value).sum();
            total as f64 / self.flow_complexities.len() as f64
        };
        let highest = self
            .flow_complexities
            .iter()
            .max_by_key(|f| f.value);
        self.complexity = Some(ComplexityBlock {
            average: round1(average),
            highest_flow: highest.map(|f| f.name.clone()),
            highest_value: highest.map(|f| f.value).unwrap_or(0),
            rating: complexity_rating(average),
        });

        let debt_minutes = code_smells * 5 + bugs * 15 + vulnerabilities * 30;
        let dev_minutes = (self.flow_count * 10 + self.sub_flow_count * 5).max(60);
        let debt_ratio = round1(debt_minutes as f64 / dev_minutes as f64 * 100.0);
        self.maintainability = Some(MaintainabilityBlock {
            code_smells,
            debt_minutes,
            dev_minutes,
            debt_ratio,
            rating: maintainability_rating(debt_ratio),
        });

        self.reliability = Some(ReliabilityBlock {
            bugs,
            rating: reliability_rating(bugs),
        });

        self.security = Some(SecurityBlock {
            vulnerabilities,
            hotspots,
            rating: security_rating(vulnerabilities),
        });
    }

    /// Highest raw complexity sample, available before aggregation
    pub fn max_complexity(&self) -> usize {
        self.flow_complexities
            .iter()
            .map(|f| f.value)
            .max()
            .unwrap_or(0)
    }

    /// Average raw complexity, available before aggregation
    pub fn average_complexity(&self) -> f64 {
        if self.flow_complexities.is_empty() {
            return 0.0;
        }
        let total: usize = self.flow_complexities.iter().map(|f| f.value).sum();
        total as f64 / self.flow_complexities.len() as f64
    }
}

/// Classify all issues of a report into the four buckets,
/// returning (bugs, vulnerabilities, code smells, hotspots)
pub fn classify_issues<'a>(
    issues: impl Iterator<Item = &'a Issue>,
) -> (usize, usize, usize, usize) {
    let mut counts = (0, 0, 0, 0);
    for issue in issues {
        match classify_rule_id(&issue.rule_id) {
            IssueKind::Bug => counts.0 += 1,
            IssueKind::Vulnerability => counts.1 += 1,
            IssueKind::CodeSmell => counts.2 += 1,
            IssueKind::SecurityHotspot => counts.3 += 1,
        }
    }
    counts
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_complexity_rating_boundaries() {
        assert_eq!(complexity_rating(0.0), Rating::A);
        assert_eq!(complexity_rating(5.0), Rating::A);
        assert_eq!(complexity_rating(5.01), Rating::B);
        assert_eq!(complexity_rating(10.0), Rating::B);
        assert_eq!(complexity_rating(10.01), Rating::C);
        assert_eq!(complexity_rating(15.0), Rating::C);
        assert_eq!(complexity_rating(15.01), Rating::D);
        assert_eq!(complexity_rating(20.0), Rating::D);
        assert_eq!(complexity_rating(20.01), Rating::E);
    }

    #[test]
    fn test_maintainability_rating_boundaries() {
        assert_eq!(maintainability_rating(0.0), Rating::A);
        assert_eq!(maintainability_rating(5.0), Rating::A);
        assert_eq!(maintainability_rating(5.1), Rating::B);
        assert_eq!(maintainability_rating(10.0), Rating::B);
        assert_eq!(maintainability_rating(10.1), Rating::C);
        assert_eq!(maintainability_rating(20.0), Rating::C);
        assert_eq!(maintainability_rating(20.1), Rating::D);
        assert_eq!(maintainability_rating(50.0), Rating::D);
        assert_eq!(maintainability_rating(50.1), Rating::E);
    }

    #[test]
    fn test_reliability_rating_boundaries() {
        assert_eq!(reliability_rating(0), Rating::A);
        assert_eq!(reliability_rating(1), Rating::B);
        assert_eq!(reliability_rating(2), Rating::B);
        assert_eq!(reliability_rating(3), Rating::C);
        assert_eq!(reliability_rating(5), Rating::C);
        assert_eq!(reliability_rating(6), Rating::D);
        assert_eq!(reliability_rating(10), Rating::D);
        assert_eq!(reliability_rating(11), Rating::E);
    }

    #[test]
    fn test_security_rating_boundaries() {
        assert_eq!(security_rating(0), Rating::A);
        assert_eq!(security_rating(1), Rating::B);
        assert_eq!(security_rating(2), Rating::C);
        assert_eq!(security_rating(3), Rating::C);
        assert_eq!(security_rating(4), Rating::D);
        assert_eq!(security_rating(5), Rating::D);
        assert_eq!(security_rating(6), Rating::E);
    }

    #[test]
    fn test_rating_monotonicity() {
        let mut previous = Rating::A;
        for bugs in 0..20 {
            let rating = reliability_rating(bugs);
            assert!(rating >= previous, "reliability regressed at {}", bugs);
            previous = rating;
        }
    }

    #[test]
    fn test_classification_priority() {
        // Vulnerability prefixes win over the broader hotspot prefix
        assert_eq!(
            classify_rule_id("security-hardcoded-credentials"),
            IssueKind::Vulnerability
        );
        assert_eq!(
            classify_rule_id("security-insecure-endpoint"),
            IssueKind::Vulnerability
        );
        // Remaining security rules are hotspots
        assert_eq!(
            classify_rule_id("security-missing-tls"),
            IssueKind::SecurityHotspot
        );
        assert_eq!(
            classify_rule_id("flow-missing-error-handler"),
            IssueKind::Bug
        );
        assert_eq!(classify_rule_id("PARSE-ERROR"), IssueKind::Bug);
        assert_eq!(classify_rule_id("doc-flow-description"), IssueKind::CodeSmell);
    }

    #[test]
    fn test_classification_is_a_partition() {
        let ids = [
            "security-hardcoded-credentials",
            "security-missing-tls",
            "flow-missing-error-handler",
            "flow-name-convention",
            "perf-payload-logging",
            "PARSE-ERROR",
        ];
        for id in ids {
            // classify_rule_id is total and single-valued by construction;
            // verify the overlapping prefixes pick exactly the first bucket
            let kind = classify_rule_id(id);
            if id.starts_with("security-hardcoded") || id.starts_with("security-insecure") {
                assert_eq!(kind, IssueKind::Vulnerability);
            } else if id.starts_with("security-") {
                assert_eq!(kind, IssueKind::SecurityHotspot);
            }
        }
    }

    #[test]
    fn test_collect_counts() {
        let content = r#"<mule xmlns:http="h" xmlns:db="d" xmlns:ee="e" xmlns:doc="dd">
  <flow name="intake">
    <http:listener path="/in"/>
    <ee:transform doc:name="map"/>
    <db:select/>
    <choice><when><logger/></when><otherwise><logger/></otherwise></choice>
  </flow>
  <sub-flow name="helper">
    <db:insert/>
  </sub-flow>
</mule>"#;
        let doc = FlowDocument::parse(content, Path::new("t.xml")).unwrap();
        let metrics = ProjectMetrics::collect(&doc, "src/main/mule/t.xml");

        assert_eq!(metrics.flow_count, 1);
        assert_eq!(metrics.sub_flow_count, 1);
        assert_eq!(metrics.listener_count, 1);
        assert_eq!(metrics.transform_count, 1);
        assert_eq!(metrics.connector_count, 2); // db:select, db:insert
        assert_eq!(metrics.flow_complexities.len(), 2);

        // flow: choice + when + otherwise = 3 decisions, complexity 4
        let intake = metrics
            .flow_complexities
            .iter()
            .find(|f| f.name == "intake")
            .unwrap();
        assert_eq!(intake.value, 4);
    }

    #[test]
    fn test_merge_is_additive() {
        let content_a = r#"<mule><flow name="a"><choice><when/></choice></flow></mule>"#;
        let content_b = r#"<mule><flow name="b"/><sub-flow name="c"/></mule>"#;
        let doc_a = FlowDocument::parse(content_a, Path::new("a.xml")).unwrap();
        let doc_b = FlowDocument::parse(content_b, Path::new("b.xml")).unwrap();

        let mut total = ProjectMetrics::collect(&doc_a, "a.xml");
        total.merge(ProjectMetrics::collect(&doc_b, "b.xml"));

        assert_eq!(total.flow_count, 2);
        assert_eq!(total.sub_flow_count, 1);
        assert_eq!(total.flow_complexities.len(), 3);
        assert_eq!(total.max_complexity(), 3);
    }

    #[test]
    fn test_aggregate_debt_ratio_floor() {
        // debtMinutes=100, flowCount=2 -> devMinutes=max(20,60)=60
        // debtRatio = 100/60*100 = 166.7 -> rating E
        let mut metrics = ProjectMetrics {
            flow_count: 2,
            ..Default::default()
        };
        let issues: Vec<Issue> = (0..20)
            .map(|_| Issue::new("flow-name-convention", Severity::Warning, "m", 1))
            .collect(); // 20 smells x5 = 100 debt minutes
        let files = vec![FileResult::parsed(
            PathBuf::from("a.xml"),
            "a.xml".to_string(),
            issues,
        )];

        metrics.aggregate(&files);
        let m = metrics.maintainability.unwrap();
        assert_eq!(m.debt_minutes, 100);
        assert_eq!(m.dev_minutes, 60);
        assert_eq!(m.debt_ratio, 166.7);
        assert_eq!(m.rating, Rating::E);
    }

    #[test]
    fn test_aggregate_highest_flow() {
        let content = r#"<mule>
  <flow name="simple"/>
  <flow name="branchy"><choice><when/><when/><otherwise/></choice></flow>
</mule>"#;
        let doc = FlowDocument::parse(content, Path::new("t.xml")).unwrap();
        let mut metrics = ProjectMetrics::collect(&doc, "t.xml");
        metrics.aggregate(&[]);

        let c = metrics.complexity.unwrap();
        assert_eq!(c.highest_flow.as_deref(), Some("branchy"));
        assert_eq!(c.highest_value, 5);
        assert_eq!(c.rating, Rating::A);
    }

    #[test]
    fn test_is_empty() {
        assert!(ProjectMetrics::default().is_empty());
        let content = r#"<mule><flow name="a"/></mule>"#;
        let doc = FlowDocument::parse(content, Path::new("t.xml")).unwrap();
        assert!(!ProjectMetrics::collect(&doc, "t.xml").is_empty());
    }
}
