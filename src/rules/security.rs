//! Security rules

use crate::context::ValidationContext;
use crate::document::{FlowDocument, FlowNode};
use crate::issue::{Issue, IssueType, Severity};
use crate::rule::{node_issue, Rule, RuleCategory};

/// Attribute names that hold credentials
const CREDENTIAL_ATTRS: &[&str] = &[
    "password",
    "passphrase",
    "secret",
    "accessKey",
    "secretKey",
    "token",
    "clientSecret",
];

/// A value that is a property placeholder or expression, not a literal
fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    (trimmed.starts_with("${") || trimmed.starts_with("#[")) && !trimmed.is_empty()
}

/// Credentials must come from property placeholders, never literals
pub struct HardcodedCredentials;

impl Rule for HardcodedCredentials {
    fn id(&self) -> &'static str {
        "security-hardcoded-credentials"
    }

    fn name(&self) -> &'static str {
        "Hardcoded credentials"
    }

    fn description(&self) -> &'static str {
        "Credential attributes with literal values leak secrets into source control"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Security
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Vulnerability
    }

    fn validate(&self, document: &FlowDocument, _context: &ValidationContext) -> Vec<Issue> {
        let mut issues = Vec::new();
        for node in document.iter().filter(|n| n.is_element()) {
            for (attr, value) in &node.attrs {
                if !CREDENTIAL_ATTRS.iter().any(|c| attr.eq_ignore_ascii_case(c)) {
                    continue;
                }
                if value.is_empty() || is_placeholder(value) {
                    continue;
                }
                issues.push(
                    node_issue(
                        self,
                        document,
                        node,
                        &format!(
                            "Attribute '{}' on <{}> has a hardcoded value",
                            attr, node.name
                        ),
                    )
                    .with_suggestion(
                        "Move the value into a secure property and reference it with ${...}",
                    ),
                );
            }
        }
        issues
    }
}

/// Plain-HTTP endpoint URLs
pub struct InsecureEndpoint;

impl Rule for InsecureEndpoint {
    fn id(&self) -> &'static str {
        "security-insecure-endpoint"
    }

    fn name(&self) -> &'static str {
        "Insecure endpoint"
    }

    fn description(&self) -> &'static str {
        "Endpoints addressed over plain HTTP transmit data unencrypted"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Security
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Vulnerability
    }

    fn validate(&self, document: &FlowDocument, _context: &ValidationContext) -> Vec<Issue> {
        let mut issues = Vec::new();
        for node in document.iter().filter(|n| n.is_element()) {
            for (attr, value) in &node.attrs {
                if !value.trim_start().starts_with("http://") {
                    continue;
                }
                issues.push(
                    node_issue(
                        self,
                        document,
                        node,
                        &format!(
                            "Attribute '{}' on <{}> uses an http:// URL",
                            attr, node.name
                        ),
                    )
                    .with_suggestion("Use https:// or terminate TLS in front of the endpoint"),
                );
            }
        }
        issues
    }
}

fn has_tls_descendant(document: &FlowDocument, node: &FlowNode) -> bool {
    document
        .descendants_of(node)
        .iter()
        .any(|d| d.is_element() && (d.local_name == "context" || d.prefix.as_deref() == Some("tls")))
}

/// HTTP connections without TLS configuration
pub struct MissingTls;

impl Rule for MissingTls {
    fn id(&self) -> &'static str {
        "security-missing-tls"
    }

    fn name(&self) -> &'static str {
        "Connection without TLS"
    }

    fn description(&self) -> &'static str {
        "HTTP listener and request connections should declare HTTPS or a TLS context"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Security
    }

    fn issue_type(&self) -> IssueType {
        IssueType::Vulnerability
    }

    fn validate(&self, document: &FlowDocument, _context: &ValidationContext) -> Vec<Issue> {
        document
            .iter()
            .filter(|n| {
                n.is_element()
                    && (n.local_name == "listener-connection"
                        || n.local_name == "request-connection")
            })
            .filter(|n| {
                let https = n
                    .attribute("protocol")
                    .map(|p| p.eq_ignore_ascii_case("https"))
                    .unwrap_or(false);
                !https && !has_tls_descendant(document, n)
            })
            .map(|n| {
                node_issue(
                    self,
                    document,
                    n,
                    &format!("<{}> does not use HTTPS or a TLS context", n.name),
                )
                .with_suggestion("Set protocol=\"HTTPS\" and add a <tls:context> block")
            })
            .collect()
    }
}
