use crate::shared::Result;
use std::cell::Cell;

/// Maximum number of exclude patterns accepted from configuration
const MAX_EXCLUDE_PATTERNS: usize = 64;

/// Maximum length of a single exclude pattern
const MAX_PATTERN_LENGTH: usize = 255;

/// ProjectFilter - excludes discovered projects by name
///
/// Patterns support `*` wildcards matching zero or more characters and are
/// compared case-sensitively against the project name.
#[derive(Debug, Default)]
pub struct ProjectFilter {
    patterns: Vec<ExcludePattern>,
}

#[derive(Debug)]
struct ExcludePattern {
    original: String,
    parts: Vec<String>,
    matched: Cell<bool>,
}

impl ProjectFilter {
    /// Compiles exclude patterns
    ///
    /// # Errors
    /// - More than 64 patterns
    /// - Empty, overlong, or wildcard-only patterns
    /// - Characters outside alphanumerics, `-`, `_`, `.`, `@`, `/` and `*`
    pub fn new(patterns: Vec<String>) -> Result<Self> {
        if patterns.len() > MAX_EXCLUDE_PATTERNS {
            anyhow::bail!(
                "Too many project exclusion patterns: {} (maximum: {})",
                patterns.len(),
                MAX_EXCLUDE_PATTERNS
            );
        }

        let patterns = patterns
            .into_iter()
            .map(|pattern| {
                validate_pattern(&pattern)?;
                let parts = pattern.split('*').map(str::to_string).collect();
                Ok(ExcludePattern {
                    original: pattern,
                    parts,
                    matched: Cell::new(false),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { patterns })
    }

    /// True when the project name matches any pattern
    pub fn is_excluded(&self, project_name: &str) -> bool {
        let mut excluded = false;
        for pattern in &self.patterns {
            if wildcard_match(&pattern.parts, project_name) {
                pattern.matched.set(true);
                excluded = true;
            }
        }
        excluded
    }

    /// Patterns that have not excluded anything so far
    pub fn unmatched_patterns(&self) -> Vec<String> {
        self.patterns
            .iter()
            .filter(|p| !p.matched.get())
            .map(|p| p.original.clone())
            .collect()
    }
}

/// Matches a name against a pattern pre-split on `*`.
///
/// The first part anchors the start, the last part anchors the end and the
/// parts in between must appear in order.
fn wildcard_match(parts: &[String], name: &str) -> bool {
    let [first, middle @ .., last] = parts else {
        // a pattern without `*` splits into exactly one part
        return parts.first().is_some_and(|p| p == name);
    };

    let Some(mut rest) = name.strip_prefix(first.as_str()) else {
        return false;
    };
    for part in middle {
        match rest.find(part.as_str()) {
            Some(pos) => rest = &rest[pos + part.len()..],
            None => return false,
        }
    }
    rest.ends_with(last.as_str())
}

fn validate_pattern(pattern: &str) -> Result<()> {
    if pattern.is_empty() {
        anyhow::bail!("Project exclusion pattern cannot be empty");
    }

    if pattern.len() > MAX_PATTERN_LENGTH {
        anyhow::bail!(
            "Project exclusion pattern is too long: {} chars. Maximum: {} chars",
            pattern.len(),
            MAX_PATTERN_LENGTH
        );
    }

    if let Some(ch) = pattern
        .chars()
        .find(|&c| !(c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '/' | '*')))
    {
        anyhow::bail!(
            "Project exclusion pattern contains invalid character '{}' in pattern '{}'",
            ch,
            pattern
        );
    }

    if pattern.chars().all(|c| c == '*') {
        anyhow::bail!(
            "Project exclusion pattern cannot contain only wildcards: '{}'",
            pattern
        );
    }

    Ok(())
}
