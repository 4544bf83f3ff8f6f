//! Lint orchestrator
//!
//! Owns the scan lifecycle: resolve the project root, discover candidate
//! files, run the per-file rule pass (optionally in parallel), run the
//! project-scope pass, then assemble the frozen report. A misbehaving rule
//! never takes down the scan; its panic is caught, logged and the rule's
//! contribution for that file dropped.

use crate::config::Config;
use crate::context::ValidationContext;
use crate::document::FlowDocument;
use crate::issue::{Issue, Severity};
use crate::metrics::ProjectMetrics;
use crate::report::{FileResult, LintReport, LintSummary, PROJECT_RESULT_NAME};
use crate::rule::{Rule, RuleCategory, RuleScope};
use crate::rules::builtin_rules;
use globset::{Glob, GlobSet, GlobSetBuilder};
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Synthetic rule ID stamped on parse-failure issues
pub const PARSE_ERROR_RULE_ID: &str = "PARSE-ERROR";

/// Files whose presence marks a directory as a project root
pub const PROJECT_MARKERS: &[&str] = &["pom.xml", "mule-artifact.json"];

/// Fatal scan error
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Target does not exist: {0}")]
    MissingTarget(PathBuf),

    #[error("Invalid include/exclude pattern: {0}")]
    Pattern(#[from] globset::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The lint orchestrator
pub struct LintEngine {
    config: Config,
    rules: Vec<Box<dyn Rule>>,
}

impl LintEngine {
    /// Engine with the built-in rule set
    pub fn new(config: Config) -> Self {
        Self {
            config,
            rules: builtin_rules(),
        }
    }

    /// Engine with an explicit rule set
    pub fn with_rules(config: Config, rules: Vec<Box<dyn Rule>>) -> Self {
        Self { config, rules }
    }

    /// Registered rules, in registration order
    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    /// Scan a file or directory and assemble the report
    pub fn scan(&self, target: &Path) -> Result<LintReport, ScanError> {
        let start = Instant::now();

        if !target.exists() {
            return Err(ScanError::MissingTarget(target.to_path_buf()));
        }
        let target = target.canonicalize()?;

        // A single file without a recognizable project above it is a
        // standalone scan: no project pass, no structure rules
        let (project_root, standalone) = resolve_root(&target);

        let include = build_globset(&self.config.files.include)?;
        let exclude = build_globset(&self.config.files.exclude)?;

        let candidates = if target.is_file() {
            vec![target.clone()]
        } else {
            let mut found = Vec::new();
            discover(&target, &project_root, &include, &exclude, &mut found)?;
            found
        };

        log::debug!(
            "scanning {} files under {} (standalone: {})",
            candidates.len(),
            project_root.display(),
            standalone
        );

        let mut results: Vec<(FileResult, ProjectMetrics)> = if self.config.engine.parallel {
            candidates
                .par_iter()
                .map(|path| self.process_file(path, &project_root, standalone))
                .collect()
        } else {
            candidates
                .iter()
                .map(|path| self.process_file(path, &project_root, standalone))
                .collect()
        };

        let mut metrics = ProjectMetrics::default();
        let mut files: Vec<FileResult> = Vec::with_capacity(results.len() + 1);
        for (result, delta) in results.drain(..) {
            metrics.merge(delta);
            files.push(result);
        }

        if !standalone {
            if let Some(project_result) = self.project_pass(&project_root) {
                files.push(project_result);
            }
        }

        let summary = LintSummary::from_files(&files);
        let metrics = if metrics.is_empty() {
            None
        } else {
            let mut metrics = metrics;
            metrics.aggregate(&files);
            Some(metrics)
        };

        Ok(LintReport {
            project_root,
            timestamp: chrono::Utc::now().to_rfc3339(),
            duration_ms: start.elapsed().as_millis() as u64,
            files,
            summary,
            metrics,
        })
    }

    fn process_file(
        &self,
        path: &Path,
        project_root: &Path,
        standalone: bool,
    ) -> (FileResult, ProjectMetrics) {
        let relative = relative_path(path, project_root);

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                return (
                    parse_failure(path, relative, &e.to_string()),
                    ProjectMetrics::default(),
                );
            }
        };

        let document = match FlowDocument::parse(&content, path) {
            Ok(document) => document,
            Err(e) => {
                return (
                    parse_failure(path, relative, &e.to_string()),
                    ProjectMetrics::default(),
                );
            }
        };

        let metrics = ProjectMetrics::collect(&document, &relative);

        let mut issues = Vec::new();
        for rule in &self.rules {
            if rule.scope() != RuleScope::PerFile {
                continue;
            }
            // Structure rules are meaningless without a known project root
            if standalone && rule.category() == RuleCategory::Structure {
                continue;
            }
            let rule_config = self.config.rule_config(rule.id());
            if !rule_config.enabled {
                continue;
            }
            let context = ValidationContext {
                file_path: path.to_path_buf(),
                relative_path: relative.clone(),
                project_root: project_root.to_path_buf(),
                rule_config,
            };
            issues.extend(self.run_rule(rule.as_ref(), &document, &context));
        }

        issues.sort_by_key(|i| (i.line, i.column.unwrap_or(0)));

        (
            FileResult::parsed(path.to_path_buf(), relative, issues),
            metrics,
        )
    }

    /// Run one rule with panic isolation and the severity override applied
    fn run_rule(
        &self,
        rule: &dyn Rule,
        document: &FlowDocument,
        context: &ValidationContext,
    ) -> Vec<Issue> {
        let outcome = catch_unwind(AssertUnwindSafe(|| rule.validate(document, context)));
        let mut issues = match outcome {
            Ok(issues) => issues,
            Err(_) => {
                log::warn!(
                    "rule '{}' panicked on {}; skipping its results for this file",
                    rule.id(),
                    context.file_path.display()
                );
                return Vec::new();
            }
        };
        if let Some(severity) = context.rule_config.severity_override {
            for issue in &mut issues {
                issue.severity = severity;
            }
        }
        issues
    }

    /// Run project-wide rules once, against a synthetic empty document
    fn project_pass(&self, project_root: &Path) -> Option<FileResult> {
        let document = FlowDocument::empty(project_root);
        let mut issues = Vec::new();

        for rule in &self.rules {
            if rule.scope() != RuleScope::ProjectWide {
                continue;
            }
            rule.reset();
            let rule_config = self.config.rule_config(rule.id());
            if !rule_config.enabled {
                continue;
            }
            let context = ValidationContext {
                file_path: project_root.to_path_buf(),
                relative_path: PROJECT_RESULT_NAME.to_string(),
                project_root: project_root.to_path_buf(),
                rule_config,
            };
            issues.extend(self.run_rule(rule.as_ref(), &document, &context));
        }

        if issues.is_empty() {
            return None;
        }
        Some(FileResult::parsed(
            project_root.to_path_buf(),
            PROJECT_RESULT_NAME.to_string(),
            issues,
        ))
    }
}

// The synthetic issue is anchored at line 1; the parser's own line number
// stays in the message
fn parse_failure(path: &Path, relative: String, message: &str) -> FileResult {
    let issue = Issue::new(
        PARSE_ERROR_RULE_ID,
        Severity::Error,
        &format!("File could not be parsed: {}", message),
        1,
    );
    FileResult::parse_failed(path.to_path_buf(), relative, issue, message.to_string())
}

fn is_project_root(dir: &Path) -> bool {
    PROJECT_MARKERS.iter().any(|m| dir.join(m).is_file())
}

/// Resolve the project root for a target; the second element is true when
/// no project could be recognized around a single-file target
fn resolve_root(target: &Path) -> (PathBuf, bool) {
    if target.is_dir() {
        return (target.to_path_buf(), false);
    }
    for ancestor in target.ancestors().skip(1) {
        if is_project_root(ancestor) {
            return (ancestor.to_path_buf(), false);
        }
    }
    let fallback = target
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    (fallback, true)
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, globset::Error> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    builder.build()
}

fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// Recursive discovery with deterministic ordering
fn discover(
    dir: &Path,
    root: &Path,
    include: &GlobSet,
    exclude: &GlobSet,
    out: &mut Vec<PathBuf>,
) -> Result<(), ScanError> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect();
    entries.sort();

    for entry in entries {
        let relative = relative_path(&entry, root);
        if exclude.is_match(&relative) {
            continue;
        }
        if entry.is_dir() {
            discover(&entry, root, include, exclude, out)?;
        } else if include.is_match(&relative) {
            out.push(entry);
        }
    }
    Ok(())
}
