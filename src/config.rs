//! Configuration system
//!
//! Reads configuration from:
//! - `.flowlintrc.yaml` / `.flowlintrc.json` (project-level)
//! - `~/.flowlintrc.yaml` (user-level)
//!
//! Rule entries accept a boolean shorthand (`flow-name-convention: false`)
//! or a detailed form with severity override and options.

use crate::context::RuleConfig;
use crate::issue::Severity;
use crate::quality_gate::QualityGate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown quality gate: {0}")]
    UnknownGate(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable parallel per-file processing
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// File discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Include patterns, relative to the project root
    pub include: Vec<String>,

    /// Exclude patterns
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.xml".to_string()],
            exclude: vec![
                "**/target/**".to_string(),
                "**/.mule/**".to_string(),
                "**/node_modules/**".to_string(),
                "**/munit/**".to_string(),
            ],
        }
    }
}

/// One rule entry: a plain toggle or the detailed form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    /// Boolean shorthand toggles enablement only
    Toggle(bool),
    /// Detailed form with severity override and options
    Detailed {
        #[serde(default = "default_true")]
        enabled: bool,
        #[serde(default)]
        severity: Option<Severity>,
        #[serde(default)]
        options: HashMap<String, serde_yaml::Value>,
    },
}

fn default_true() -> bool {
    true
}

impl RuleSetting {
    /// Resolve into the per-invocation rule configuration
    pub fn resolve(&self) -> RuleConfig {
        match self {
            RuleSetting::Toggle(enabled) => RuleConfig::toggle(*enabled),
            RuleSetting::Detailed {
                enabled,
                severity,
                options,
            } => RuleConfig {
                enabled: *enabled,
                severity_override: *severity,
                options: options.clone(),
            },
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub engine: EngineConfig,

    /// File discovery settings
    pub files: FilesConfig,

    /// Per-rule configuration, keyed by rule ID
    pub rules: HashMap<String, RuleSetting>,

    /// Rules disabled from the command line
    pub disabled: Vec<String>,

    /// When non-empty, only these rules run
    pub selected: Vec<String>,

    /// Custom quality gates
    pub quality_gates: Vec<QualityGate>,

    /// Gate to evaluate after scanning
    pub gate: Option<String>,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file (YAML or JSON by extension)
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        match ext {
            "yaml" | "yml" => Ok(serde_yaml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            _ => Err(ConfigError::Invalid(format!(
                "Unknown config file format: {}",
                ext
            ))),
        }
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_names = [
            ".flowlintrc.yaml",
            ".flowlintrc.yml",
            ".flowlintrc.json",
            "flowlint.yaml",
            "flowlint.yml",
            "flowlint.json",
        ];

        for name in &config_names {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            for name in &config_names {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        disabled: Option<Vec<String>>,
        selected: Option<Vec<String>>,
        jobs: Option<usize>,
        gate: Option<String>,
    ) {
        if let Some(disabled) = disabled {
            self.disabled.extend(disabled);
        }
        if let Some(selected) = selected {
            self.selected = selected;
        }
        if let Some(jobs) = jobs {
            self.engine.jobs = jobs;
        }
        if let Some(gate) = gate {
            self.gate = Some(gate);
        }
    }

    /// Resolve the effective configuration for one rule
    pub fn rule_config(&self, rule_id: &str) -> RuleConfig {
        let mut resolved = self
            .rules
            .get(rule_id)
            .map(|s| s.resolve())
            .unwrap_or_default();

        if self.disabled.iter().any(|id| id == rule_id) {
            resolved.enabled = false;
        }
        if !self.selected.is_empty() && !self.selected.iter().any(|id| id == rule_id) {
            resolved.enabled = false;
        }

        resolved
    }

    /// Resolve a quality gate by name: custom gates first, then built-ins.
    /// An unknown name is a fatal configuration error, surfaced before any
    /// scanning begins.
    pub fn resolve_gate(&self, name: &str) -> Result<QualityGate, ConfigError> {
        if let Some(gate) = self
            .quality_gates
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
        {
            return Ok(gate.clone());
        }
        QualityGate::builtin(name).ok_or_else(|| ConfigError::UnknownGate(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::new();
        assert!(config.engine.parallel);
        assert_eq!(config.engine.jobs, 0);
        assert!(config.files.include.contains(&"**/*.xml".to_string()));
    }

    #[test]
    fn test_boolean_shorthand() {
        let yaml = r#"
rules:
  flow-name-convention: false
  doc-flow-description: true
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(!config.rule_config("flow-name-convention").enabled);
        assert!(config.rule_config("doc-flow-description").enabled);
        // Unconfigured rules default to enabled
        assert!(config.rule_config("error-handler-empty").enabled);
    }

    #[test]
    fn test_detailed_rule_setting() {
        let yaml = r#"
rules:
  flow-name-convention:
    severity: error
    options:
      pattern: "^[a-z]+$"
  structure-max-flows-per-file:
    enabled: false
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        let naming = config.rule_config("flow-name-convention");
        assert!(naming.enabled);
        assert_eq!(naming.severity_override, Some(Severity::Error));
        assert_eq!(naming.option("pattern", String::new()), "^[a-z]+$");

        assert!(!config.rule_config("structure-max-flows-per-file").enabled);
    }

    #[test]
    fn test_merge_cli_disable_and_select() {
        let mut config = Config::new();
        config.merge_cli(Some(vec!["rule-a".to_string()]), None, Some(4), None);
        assert!(!config.rule_config("rule-a").enabled);
        assert!(config.rule_config("rule-b").enabled);
        assert_eq!(config.engine.jobs, 4);

        config.merge_cli(None, Some(vec!["only-this".to_string()]), None, None);
        assert!(config.rule_config("only-this").enabled);
        assert!(!config.rule_config("rule-b").enabled);
    }

    #[test]
    fn test_resolve_builtin_gates() {
        let config = Config::new();
        assert_eq!(config.resolve_gate("Default").unwrap().name, "Default");
        assert_eq!(config.resolve_gate("strict").unwrap().name, "Strict");
        assert!(matches!(
            config.resolve_gate("no-such-gate"),
            Err(ConfigError::UnknownGate(_))
        ));
    }

    #[test]
    fn test_custom_gate_from_yaml() {
        let yaml = r#"
gate: team-gate
quality_gates:
  - name: team-gate
    conditions:
      - metric: errors
        operator: ">"
        threshold: 2
        status: fail
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        let gate = config.resolve_gate("team-gate").unwrap();
        assert_eq!(gate.conditions.len(), 1);
        assert_eq!(gate.conditions[0].metric, "errors");
    }

    #[test]
    fn test_custom_gate_shadows_builtin() {
        let yaml = r#"
quality_gates:
  - name: Default
    conditions: []
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(config.resolve_gate("Default").unwrap().conditions.is_empty());
    }
}
