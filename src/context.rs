//! Per-invocation validation context

use crate::issue::Severity;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;

/// Resolved configuration for one rule
#[derive(Debug, Clone)]
pub struct RuleConfig {
    /// Whether the rule runs at all
    pub enabled: bool,

    /// Severity to stamp on the rule's issues instead of its default
    pub severity_override: Option<Severity>,

    /// Free-form rule options from configuration
    pub options: HashMap<String, serde_yaml::Value>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity_override: None,
            options: HashMap::new(),
        }
    }
}

impl RuleConfig {
    /// Shorthand for a plain on/off toggle with no options
    pub fn toggle(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    /// Read a typed option, falling back to the default when the key is
    /// missing or the value does not deserialize to `T`
    pub fn option<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.options.get(key) {
            Some(value) => serde_yaml::from_value(value.clone()).unwrap_or(default),
            None => default,
        }
    }
}

/// Read-only input to a single rule invocation
///
/// Never mutated by rules. The project-scope pass uses a synthetic context
/// whose `file_path` is the project root itself.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    /// Absolute path of the file under validation
    pub file_path: PathBuf,

    /// Path relative to the project root, with forward slashes
    pub relative_path: String,

    /// Resolved project root
    pub project_root: PathBuf,

    /// Resolved configuration for the invoked rule
    pub rule_config: RuleConfig,
}

impl ValidationContext {
    /// Typed option lookup, see [`RuleConfig::option`]
    pub fn option<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.rule_config.option(key, default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_missing_returns_default() {
        let config = RuleConfig::default();
        assert_eq!(config.option("max", 3usize), 3);
        assert_eq!(config.option("pattern", String::from("^x$")), "^x$");
    }

    #[test]
    fn test_option_typed_lookup() {
        let mut config = RuleConfig::default();
        config
            .options
            .insert("max".to_string(), serde_yaml::Value::from(7));
        config
            .options
            .insert("pattern".to_string(), serde_yaml::Value::from("^[a-z]+$"));

        assert_eq!(config.option("max", 3usize), 7);
        assert_eq!(config.option("pattern", String::new()), "^[a-z]+$");
    }

    #[test]
    fn test_option_type_mismatch_falls_back() {
        let mut config = RuleConfig::default();
        config
            .options
            .insert("max".to_string(), serde_yaml::Value::from("not-a-number"));
        assert_eq!(config.option("max", 5usize), 5);
    }

    #[test]
    fn test_toggle() {
        let config = RuleConfig::toggle(false);
        assert!(!config.enabled);
        assert!(config.options.is_empty());
    }
}
