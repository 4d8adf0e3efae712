//! Ecosystem package inventory.
//!
//! Reads manifests and lockfiles through a [`ManifestReader`] and resolves
//! each declared dependency to its installed version. The inventory is best
//! effort: a missing or malformed file contributes nothing.

mod cargo;
mod composer;
mod go;
mod node;
mod python;

use crate::health::domain::{strip_range_operator, Ecosystem, Language, Package};
use crate::ports::outbound::ManifestReader;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// A dependency as written in a manifest: name plus declared range
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Declared {
    pub name: String,
    pub range: String,
}

impl Declared {
    pub fn new(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
        }
    }
}

/// Resolved (name, version) pairs from a lockfile, in file order
pub(crate) type Locked = Vec<(String, String)>;

/// PackageInventory - builds the installed package list of a project
pub struct PackageInventory<'a, R: ManifestReader + ?Sized> {
    reader: &'a R,
}

impl<'a, R: ManifestReader + ?Sized> PackageInventory<'a, R> {
    pub fn new(reader: &'a R) -> Self {
        Self { reader }
    }

    /// Collects the packages of a project in discovery order.
    ///
    /// Never fails: unreadable or unparseable sources yield fewer packages.
    pub fn collect(&self, project_path: &Path, language: Language) -> Vec<Package> {
        let packages = match language {
            Language::Node => node::collect(self, project_path),
            Language::Python => python::collect(self, project_path),
            Language::Rust => cargo::collect(self, project_path),
            Language::Go => go::collect(self, project_path),
            Language::Php => composer::collect(self, project_path),
        };

        tracing::debug!(
            project = %project_path.display(),
            %language,
            count = packages.len(),
            "inventory collected"
        );
        packages
    }

    /// Reads a file, mapping every failure to `None`
    pub(crate) fn read(&self, project_path: &Path, relative_path: &str) -> Option<String> {
        match self.reader.read_manifest(project_path, relative_path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::trace!(file = relative_path, error = %e, "manifest unavailable");
                None
            }
        }
    }
}

/// Resolves declared dependencies against installed versions.
///
/// - The installed version (from `installed`) wins over the declared range.
/// - Ranges are reduced to a version by stripping their operator.
/// - Duplicate names keep their first occurrence.
/// - With no declarations at all, the locked list is used as-is.
pub(crate) fn resolve<F>(
    ecosystem: Ecosystem,
    declared: Vec<Declared>,
    mut installed: F,
    locked: Locked,
) -> Vec<Package>
where
    F: FnMut(&str) -> Option<String>,
{
    let candidates: Vec<(String, String)> = if declared.is_empty() {
        locked
    } else {
        declared
            .into_iter()
            .map(|d| {
                let version = installed(&d.name).unwrap_or_else(|| strip_range_operator(&d.range));
                (d.name, version)
            })
            .collect()
    };

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|(name, _)| seen.insert(name.clone()))
        .filter_map(|(name, version)| match Package::new(name.clone(), version, ecosystem) {
            Ok(package) => Some(package),
            Err(e) => {
                tracing::debug!(package = %name, error = %e, "skipping unresolvable dependency");
                None
            }
        })
        .collect()
}

/// First-occurrence index of a locked list, keyed by a normalized name
pub(crate) fn lock_index<N>(locked: &Locked, normalize: N) -> HashMap<String, String>
where
    N: Fn(&str) -> String,
{
    let mut index = HashMap::with_capacity(locked.len());
    for (name, version) in locked {
        index
            .entry(normalize(name))
            .or_insert_with(|| version.clone());
    }
    index
}
