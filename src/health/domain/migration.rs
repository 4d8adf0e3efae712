use regex::Regex;
use serde::{Deserialize, Serialize};

/// How disruptive a matched migration pattern is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Breaking,
    Deprecated,
    Recommended,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueSeverity::Breaking => write!(f, "breaking"),
            IssueSeverity::Deprecated => write!(f, "deprecated"),
            IssueSeverity::Recommended => write!(f, "recommended"),
        }
    }
}

/// A single risk pattern inside a migration rule
#[derive(Debug, Clone)]
pub struct MigrationPattern {
    pub regex: Regex,
    pub extensions: &'static [&'static str],
    pub severity: IssueSeverity,
    pub message: &'static str,
    pub migration_hint: &'static str,
}

impl MigrationPattern {
    pub fn applies_to(&self, extension: &str) -> bool {
        self.extensions
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Upgrade path for one framework from one major version to the next
#[derive(Debug, Clone)]
pub struct MigrationRule {
    pub framework: &'static str,
    pub from_major: u64,
    pub to_major: u64,
    pub guide_url: &'static str,
    pub patterns: Vec<MigrationPattern>,
}

impl MigrationRule {
    /// Union of all extensions targeted by this rule's patterns
    pub fn extensions(&self) -> Vec<&'static str> {
        let mut exts: Vec<&'static str> = self
            .patterns
            .iter()
            .flat_map(|p| p.extensions.iter().copied())
            .collect();
        exts.sort_unstable();
        exts.dedup();
        exts
    }
}

/// One pattern hit on one source line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationIssue {
    pub severity: IssueSeverity,
    pub pattern_source: String,
    pub file: String,
    pub line: usize,
    pub message: String,
    pub migration_hint: String,
}

/// Outcome of the migration pattern engine for one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    pub framework: Option<String>,
    pub current_version: Option<String>,
    pub from_major: Option<u64>,
    pub to_major: Option<u64>,
    pub guide_url: Option<String>,
    pub issues: Vec<MigrationIssue>,
    pub migration_needed: bool,
}

impl MigrationReport {
    /// Result when no upgrade path applies; no files are scanned
    pub fn not_needed(framework: Option<String>, current_version: Option<String>) -> Self {
        Self {
            framework,
            current_version,
            from_major: None,
            to_major: None,
            guide_url: None,
            issues: Vec::new(),
            migration_needed: false,
        }
    }

    pub fn count_by_severity(&self, severity: IssueSeverity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}
