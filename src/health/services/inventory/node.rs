//! package.json / node_modules / package-lock.json

use super::{lock_index, resolve, Declared, Locked, PackageInventory};
use crate::health::domain::{Ecosystem, Package};
use crate::ports::outbound::ManifestReader;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

pub(super) fn collect<R: ManifestReader + ?Sized>(
    inventory: &PackageInventory<'_, R>,
    project_path: &Path,
) -> Vec<Package> {
    let declared = inventory
        .read(project_path, "package.json")
        .map(|content| parse_package_json(&content))
        .unwrap_or_default();

    let locked = inventory
        .read(project_path, "package-lock.json")
        .map(|content| parse_package_lock(&content))
        .unwrap_or_default();
    let lock = lock_index(&locked, str::to_string);

    resolve(
        Ecosystem::Npm,
        declared,
        |name| {
            // Materialized package metadata is the strongest evidence of what is installed
            inventory
                .read(project_path, &format!("node_modules/{}/package.json", name))
                .and_then(|content| installed_version(&content))
                .or_else(|| lock.get(name).cloned())
        },
        locked,
    )
}

/// Declared dependencies of a package.json in file order
pub(crate) fn parse_package_json(content: &str) -> Vec<Declared> {
    let Ok(Value::Object(manifest)) = serde_json::from_str::<Value>(content) else {
        return Vec::new();
    };

    DEPENDENCY_SECTIONS
        .iter()
        .filter_map(|section| manifest.get(*section).and_then(Value::as_object))
        .flat_map(Map::iter)
        .filter_map(|(name, range)| range.as_str().map(|r| Declared::new(name.clone(), r)))
        .collect()
}

#[derive(Deserialize)]
struct InstalledManifest {
    version: Option<String>,
}

fn installed_version(content: &str) -> Option<String> {
    serde_json::from_str::<InstalledManifest>(content)
        .ok()
        .and_then(|m| m.version)
}

#[derive(Deserialize)]
struct PackageLock {
    #[serde(default)]
    packages: Map<String, Value>,
    #[serde(default)]
    dependencies: Map<String, Value>,
}

/// Top-level installed packages of a package-lock.json (v1, v2 and v3)
pub(crate) fn parse_package_lock(content: &str) -> Locked {
    let Ok(lock) = serde_json::from_str::<PackageLock>(content) else {
        return Vec::new();
    };

    if !lock.packages.is_empty() {
        return lock
            .packages
            .iter()
            .filter_map(|(key, entry)| {
                let name = key.strip_prefix("node_modules/")?;
                // nested installs (node_modules/a/node_modules/b) are not top-level
                if name.contains("/node_modules/") {
                    return None;
                }
                let version = entry.get("version")?.as_str()?;
                Some((name.to_string(), version.to_string()))
            })
            .collect();
    }

    lock.dependencies
        .iter()
        .filter_map(|(name, entry)| {
            let version = entry.get("version")?.as_str()?;
            Some((name.clone(), version.to_string()))
        })
        .collect()
}
