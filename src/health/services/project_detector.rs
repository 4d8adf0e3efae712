//! Project discovery and language/framework detection.

use super::project_filter::ProjectFilter;
use crate::health::domain::{Language, ProjectRef};
use crate::health::rules::normalize_framework;
use crate::ports::outbound::ManifestReader;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Default depth below each scan root searched for projects
pub const DEFAULT_DISCOVERY_DEPTH: usize = 3;

/// Marker file per language, in detection priority order
const MARKERS: &[(&str, Language)] = &[
    ("package.json", Language::Node),
    ("Cargo.toml", Language::Rust),
    ("go.mod", Language::Go),
    ("composer.json", Language::Php),
    ("pyproject.toml", Language::Python),
    ("requirements.txt", Language::Python),
];

/// Governing framework packages, most specific first. A Next.js app also
/// depends on react, so next must win over react.
const FRAMEWORK_PACKAGES: &[&str] = &[
    "next",
    "nuxt",
    "@sveltejs/kit",
    "svelte",
    "@angular/core",
    "vue",
    "react",
    "express",
    "tailwindcss",
];

const SKIPPED_DIRS: &[&str] = &["node_modules", "vendor", "target", "dist", "build", "venv"];

/// ProjectDetector - finds projects under scan roots
pub struct ProjectDetector<'a, R: ManifestReader + ?Sized> {
    reader: &'a R,
    max_depth: usize,
}

impl<'a, R: ManifestReader + ?Sized> ProjectDetector<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self {
            reader,
            max_depth: DEFAULT_DISCOVERY_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Detects the project rooted exactly at `path`, if any
    pub fn detect(&self, path: &Path) -> Option<ProjectRef> {
        let language = MARKERS
            .iter()
            .find(|(marker, _)| path.join(marker).is_file())
            .map(|(_, language)| *language)?;

        let framework = match language {
            Language::Node => self
                .reader
                .read_manifest(path, "package.json")
                .ok()
                .and_then(|content| detect_framework(&content)),
            _ => None,
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Some(ProjectRef::new(name, path.to_path_buf(), language, framework))
    }

    /// Finds every project under the roots, sorted by path.
    ///
    /// A directory that is a project is not searched further, so nested
    /// workspace members are reported through their root.
    pub fn discover(&self, roots: &[PathBuf], filter: &ProjectFilter) -> Vec<ProjectRef> {
        let mut projects = Vec::new();
        for root in roots {
            self.walk(root, 0, &mut projects);
        }
        projects.sort_by(|a, b| a.path.cmp(&b.path));
        projects.dedup_by(|a, b| a.path == b.path);

        projects.retain(|p| {
            let excluded = filter.is_excluded(&p.name);
            if excluded {
                tracing::debug!(project = %p.name, "project excluded by configuration");
            }
            !excluded
        });

        for pattern in filter.unmatched_patterns() {
            tracing::warn!(pattern = %pattern, "exclude pattern did not match any project");
        }
        projects
    }

    fn walk(&self, dir: &Path, depth: usize, projects: &mut Vec<ProjectRef>) {
        if let Some(project) = self.detect(dir) {
            projects.push(project);
            return;
        }
        if depth >= self.max_depth {
            return;
        }

        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot read scan root");
                return;
            }
        };

        let mut subdirs: Vec<PathBuf> = entries
            .flatten()
            .filter(|e| e.file_type().is_ok_and(|t| t.is_dir()))
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .is_some_and(|n| !n.starts_with('.') && !SKIPPED_DIRS.contains(&n))
            })
            .map(|e| e.path())
            .collect();
        subdirs.sort();

        for subdir in subdirs {
            self.walk(&subdir, depth + 1, projects);
        }
    }
}

/// Governing framework declared in a package.json, normalized
pub fn detect_framework(package_json: &str) -> Option<String> {
    let manifest: Value = serde_json::from_str(package_json).ok()?;
    let declares = |name: &str| {
        ["dependencies", "devDependencies", "peerDependencies"]
            .iter()
            .any(|section| manifest.get(section).and_then(|s| s.get(name)).is_some())
    };

    FRAMEWORK_PACKAGES
        .iter()
        .find(|package| declares(package))
        .map(|package| normalize_framework(package))
}
