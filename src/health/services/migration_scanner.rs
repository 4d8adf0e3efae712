//! Source tree scanner for migration risk patterns.

use crate::health::domain::{major_of, MigrationIssue, MigrationReport, MigrationRule};
use crate::health::rules::{normalize_framework, RuleRegistry};
use std::path::{Path, PathBuf};

/// Maximum directory depth below the project root that is walked
pub const MAX_SCAN_DEPTH: usize = 5;

/// Directory names that never contain first-party sources
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "target",
    "vendor",
    "coverage",
    "__pycache__",
    ".svelte-kit",
    ".next",
    ".nuxt",
    "venv",
    ".venv",
    "out",
];

/// MigrationScanner - applies the rule for a framework's current major version
/// to every matching source file of a project.
///
/// Each pattern reports at most one issue per line, so a pattern that occurs
/// twice on the same line is counted once.
pub struct MigrationScanner<'a> {
    registry: &'a RuleRegistry,
}

impl Default for MigrationScanner<'static> {
    fn default() -> Self {
        Self::new(RuleRegistry::builtin())
    }
}

impl<'a> MigrationScanner<'a> {
    pub fn new(registry: &'a RuleRegistry) -> Self {
        Self { registry }
    }

    /// Scans a project for the upgrade away from `current_version`'s major.
    ///
    /// Without a framework, a parseable version, or a matching rule the
    /// result is "no migration needed" and the file system is not touched.
    pub fn scan(
        &self,
        project_root: &Path,
        framework: Option<&str>,
        current_version: Option<&str>,
    ) -> MigrationReport {
        let framework = framework.map(normalize_framework);
        let rule = match (framework.as_deref(), current_version.and_then(major_of)) {
            (Some(name), Some(major)) => self.registry.find(name, major),
            _ => None,
        };

        let Some(rule) = rule else {
            return MigrationReport::not_needed(framework, current_version.map(str::to_string));
        };

        let issues = scan_tree(project_root, rule);
        tracing::debug!(
            project = %project_root.display(),
            framework = rule.framework,
            from = rule.from_major,
            to = rule.to_major,
            issues = issues.len(),
            "migration scan complete"
        );

        MigrationReport {
            framework,
            current_version: current_version.map(str::to_string),
            from_major: Some(rule.from_major),
            to_major: Some(rule.to_major),
            guide_url: Some(rule.guide_url.to_string()),
            migration_needed: !issues.is_empty(),
            issues,
        }
    }
}

/// Applies a rule to every candidate file below `root`, in sorted path order
pub fn scan_tree(root: &Path, rule: &MigrationRule) -> Vec<MigrationIssue> {
    let extensions = rule.extensions();
    let mut files = Vec::new();
    collect_files(root, 0, &extensions, &mut files);
    files.sort();

    files
        .iter()
        .flat_map(|path| scan_file(root, path, rule))
        .collect()
}

fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}

fn extension_of(path: &Path) -> Option<&str> {
    path.extension().and_then(|e| e.to_str())
}

fn collect_files(dir: &Path, depth: usize, extensions: &[&str], files: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "cannot read directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let Ok(file_type) = entry.file_type() else {
            continue;
        };
        // Symlinks are not followed to keep the walk bounded
        if file_type.is_symlink() {
            continue;
        }

        let path = entry.path();
        if file_type.is_dir() {
            let name = entry.file_name();
            let skip = name.to_str().map_or(true, is_skipped_dir);
            if !skip && depth < MAX_SCAN_DEPTH {
                collect_files(&path, depth + 1, extensions, files);
            }
        } else if file_type.is_file() {
            let matches = extension_of(&path)
                .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));
            if matches {
                files.push(path);
            }
        }
    }
}

fn scan_file(root: &Path, path: &Path, rule: &MigrationRule) -> Vec<MigrationIssue> {
    let Some(extension) = extension_of(path) else {
        return Vec::new();
    };
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::debug!(file = %path.display(), error = %e, "skipping unreadable file");
            return Vec::new();
        }
    };

    let relative = relative_path(root, path);
    let patterns: Vec<_> = rule
        .patterns
        .iter()
        .filter(|p| p.applies_to(extension))
        .collect();

    let mut issues = Vec::new();
    for (index, line) in content.lines().enumerate() {
        for pattern in &patterns {
            if pattern.regex.is_match(line) {
                issues.push(MigrationIssue {
                    severity: pattern.severity,
                    pattern_source: pattern.regex.as_str().to_string(),
                    file: relative.clone(),
                    line: index + 1,
                    message: pattern.message.to_string(),
                    migration_hint: pattern.migration_hint.to_string(),
                });
            }
        }
    }
    issues
}

/// Project-relative path with `/` separators
fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::domain::{IssueSeverity, MigrationPattern};
    use regex::Regex;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn custom_rule() -> MigrationRule {
        MigrationRule {
            framework: "demo",
            from_major: 1,
            to_major: 2,
            guide_url: "https://example.com/guide",
            patterns: vec![MigrationPattern {
                regex: Regex::new(r"oldApi\(").unwrap(),
                extensions: &["js"],
                severity: IssueSeverity::Deprecated,
                message: "oldApi is deprecated",
                migration_hint: "use newApi",
            }],
        }
    }

    #[test]
    fn test_svelte_export_let_is_one_breaking_issue() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "src/routes/+page.svelte",
            "<script>\n  export let foo;\n</script>\n\n<p>{foo}</p>\n",
        );

        let report = MigrationScanner::default().scan(dir.path(), Some("svelte"), Some("4.2.19"));

        assert!(report.migration_needed);
        assert_eq!(report.issues.len(), 1);
        let issue = &report.issues[0];
        assert_eq!(issue.severity, IssueSeverity::Breaking);
        assert!(issue.migration_hint.contains("$props()"));
        assert_eq!(issue.file, "src/routes/+page.svelte");
        assert_eq!(issue.line, 2);
        assert_eq!(report.from_major, Some(4));
        assert_eq!(report.to_major, Some(5));
    }

    #[test]
    fn test_no_rule_is_not_needed() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "App.svelte", "export let foo;\n");

        let report = MigrationScanner::default().scan(dir.path(), Some("svelte"), Some("5.1.0"));
        assert!(!report.migration_needed);
        assert!(report.guide_url.is_none());

        let report = MigrationScanner::default().scan(dir.path(), None, Some("4.0.0"));
        assert!(!report.migration_needed);
    }

    #[test]
    fn test_no_rule_does_not_touch_file_system() {
        let report = MigrationScanner::default().scan(
            Path::new("/definitely/not/a/project"),
            Some("ember"),
            Some("3.0.0"),
        );
        assert!(!report.migration_needed);
        assert_eq!(report.framework.as_deref(), Some("ember"));
    }

    #[test]
    fn test_alias_resolves_to_rule() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "src/lib/Button.svelte", "<script>export let label;</script>\n");

        let report =
            MigrationScanner::default().scan(dir.path(), Some("@sveltejs/kit"), Some("^4.0.0"));
        assert_eq!(report.framework.as_deref(), Some("svelte"));
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_skipped_and_hidden_directories() {
        let dir = TempDir::new().unwrap();
        let rule = custom_rule();
        write(dir.path(), "src/a.js", "oldApi();\n");
        write(dir.path(), "node_modules/x/index.js", "oldApi();\n");
        write(dir.path(), "dist/bundle.js", "oldApi();\n");
        write(dir.path(), ".cache/tmp.js", "oldApi();\n");
        write(dir.path(), "src/readme.md", "oldApi();\n");

        let issues = scan_tree(dir.path(), &rule);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file, "src/a.js");
    }

    #[test]
    fn test_depth_limit() {
        let dir = TempDir::new().unwrap();
        let rule = custom_rule();
        write(dir.path(), "a/b/c/d/e/shallow.js", "oldApi();\n");
        write(dir.path(), "a/b/c/d/e/f/deep.js", "oldApi();\n");

        let issues = scan_tree(dir.path(), &rule);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file, "a/b/c/d/e/shallow.js");
    }

    #[test]
    fn test_one_issue_per_line_per_pattern() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "x.js", "oldApi(); oldApi();\nfine();\noldApi();\n");

        let issues = scan_tree(dir.path(), &custom_rule());
        let lines: Vec<usize> = issues.iter().map(|i| i.line).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_non_utf8_file_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("bad.js"), [0xff, 0xfe, 0x00, 0x6f]).unwrap();
        write(dir.path(), "good.js", "oldApi();\n");

        let issues = scan_tree(dir.path(), &custom_rule());
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].file, "good.js");
    }

    #[test]
    fn test_scan_is_idempotent_and_sorted() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta.js", "alpha.js", "mid/beta.js", "mid/alpha.js"] {
            write(dir.path(), name, "oldApi();\n");
        }
        let rule = custom_rule();

        let first = scan_tree(dir.path(), &rule);
        let second = scan_tree(dir.path(), &rule);
        assert_eq!(first, second);

        let files: Vec<&str> = first.iter().map(|i| i.file.as_str()).collect();
        assert_eq!(files, vec!["alpha.js", "mid/alpha.js", "mid/beta.js", "zeta.js"]);
    }
}
