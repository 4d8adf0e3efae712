//! Immutable migration rule registry.
//!
//! Rules live in an arena (`Vec<MigrationRule>`) and are indexed by
//! `(framework, from_major)`, so at most one rule can apply to a project.

mod builtin;

use crate::health::domain::{MigrationPattern, MigrationRule};
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;

pub struct RuleRegistry {
    rules: Vec<MigrationRule>,
    index: HashMap<(String, u64), usize>,
}

static BUILTIN: OnceLock<RuleRegistry> = OnceLock::new();

impl RuleRegistry {
    /// Registry of the built-in rule table, compiled on first use
    pub fn builtin() -> &'static RuleRegistry {
        BUILTIN.get_or_init(|| {
            let rules = builtin::RULES
                .iter()
                .map(|spec| MigrationRule {
                    framework: spec.framework,
                    from_major: spec.from_major,
                    to_major: spec.to_major,
                    guide_url: spec.guide_url,
                    patterns: spec
                        .patterns
                        .iter()
                        .filter_map(|p| match Regex::new(p.regex) {
                            Ok(regex) => Some(MigrationPattern {
                                regex,
                                extensions: p.extensions,
                                severity: p.severity,
                                message: p.message,
                                migration_hint: p.hint,
                            }),
                            Err(e) => {
                                tracing::warn!(
                                    framework = spec.framework,
                                    pattern = p.regex,
                                    error = %e,
                                    "skipping invalid migration pattern"
                                );
                                None
                            }
                        })
                        .collect(),
                })
                .collect();
            RuleRegistry::from_rules(rules)
        })
    }

    /// Builds a registry from explicit rules. Later duplicates of a
    /// `(framework, from_major)` key are ignored.
    pub fn from_rules(rules: Vec<MigrationRule>) -> Self {
        let mut index = HashMap::with_capacity(rules.len());
        for (i, rule) in rules.iter().enumerate() {
            index
                .entry((normalize_framework(rule.framework), rule.from_major))
                .or_insert(i);
        }
        Self { rules, index }
    }

    /// Looks up the rule for a framework (or one of its aliases) at a major version
    pub fn find(&self, framework: &str, from_major: u64) -> Option<&MigrationRule> {
        self.index
            .get(&(normalize_framework(framework), from_major))
            .map(|&i| &self.rules[i])
    }

    pub fn rules(&self) -> &[MigrationRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Collapses framework aliases (sub-tools, scoped packages) to the parent name
pub fn normalize_framework(name: &str) -> String {
    let lower = name.trim().to_lowercase();
    builtin::ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(lower)
}

/// Package whose installed version determines the framework's major version
pub fn framework_package(framework: &str) -> String {
    let canonical = normalize_framework(framework);
    builtin::FRAMEWORK_PACKAGES
        .iter()
        .find(|(name, _)| *name == canonical)
        .map(|(_, package)| package.to_string())
        .unwrap_or(canonical)
}
