//! Cargo.toml / Cargo.lock

use super::{lock_index, resolve, Declared, Locked, PackageInventory};
use crate::health::domain::{Ecosystem, Package};
use crate::ports::outbound::ManifestReader;
use serde::Deserialize;
use std::path::Path;

const DEPENDENCY_TABLES: [&str; 3] = ["dependencies", "dev-dependencies", "build-dependencies"];

pub(super) fn collect<R: ManifestReader + ?Sized>(
    inventory: &PackageInventory<'_, R>,
    project_path: &Path,
) -> Vec<Package> {
    let declared = inventory
        .read(project_path, "Cargo.toml")
        .map(|content| parse_manifest(&content))
        .unwrap_or_default();

    let locked = inventory
        .read(project_path, "Cargo.lock")
        .map(|content| parse_lock(&content))
        .unwrap_or_default();
    let lock = lock_index(&locked, str::to_string);

    resolve(
        Ecosystem::CratesIo,
        declared,
        |name| lock.get(name).cloned(),
        locked,
    )
}

/// Declared crates of a Cargo.toml, resolving `package = "..."` renames
pub(crate) fn parse_manifest(content: &str) -> Vec<Declared> {
    let Ok(manifest) = toml::from_str::<toml::Table>(content) else {
        return Vec::new();
    };

    DEPENDENCY_TABLES
        .iter()
        .filter_map(|table| manifest.get(*table).and_then(toml::Value::as_table))
        .flat_map(|table| table.iter())
        .filter_map(|(key, spec)| match spec {
            toml::Value::String(range) => Some(Declared::new(key.clone(), range.clone())),
            // `{ workspace = true }` and path/git crates carry no range; the lock decides
            toml::Value::Table(t) => {
                let range = t.get("version").and_then(toml::Value::as_str).unwrap_or_default();
                let name = t
                    .get("package")
                    .and_then(toml::Value::as_str)
                    .unwrap_or(key);
                Some(Declared::new(name, range))
            }
            _ => None,
        })
        .collect()
}

#[derive(Deserialize)]
struct CargoLock {
    #[serde(default)]
    package: Vec<LockedCrate>,
}

#[derive(Deserialize)]
struct LockedCrate {
    name: String,
    version: String,
    source: Option<String>,
}

/// Registry crates of a Cargo.lock; workspace members have no `source`
pub(crate) fn parse_lock(content: &str) -> Locked {
    let Ok(lock) = toml::from_str::<CargoLock>(content) else {
        return Vec::new();
    };

    lock.package
        .into_iter()
        .filter(|c| c.source.as_deref().is_some_and(|s| s.starts_with("registry+")))
        .map(|c| (c.name, c.version))
        .collect()
}
