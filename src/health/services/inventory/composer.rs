//! composer.json / composer.lock

use super::{lock_index, resolve, Declared, Locked, PackageInventory};
use crate::health::domain::{Ecosystem, Package};
use crate::ports::outbound::ManifestReader;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;

const REQUIRE_SECTIONS: [&str; 2] = ["require", "require-dev"];

pub(super) fn collect<R: ManifestReader + ?Sized>(
    inventory: &PackageInventory<'_, R>,
    project_path: &Path,
) -> Vec<Package> {
    let declared = inventory
        .read(project_path, "composer.json")
        .map(|content| parse_composer_json(&content))
        .unwrap_or_default();

    let locked = inventory
        .read(project_path, "composer.lock")
        .map(|content| parse_composer_lock(&content))
        .unwrap_or_default();
    let lock = lock_index(&locked, str::to_lowercase);

    resolve(
        Ecosystem::Packagist,
        declared,
        |name| lock.get(&name.to_lowercase()).cloned(),
        locked,
    )
}

/// Platform requirements (php itself, extensions) are not packages
fn is_platform_requirement(name: &str) -> bool {
    name == "php" || name.starts_with("ext-") || name.starts_with("lib-") || name.starts_with("composer-")
}

pub(crate) fn parse_composer_json(content: &str) -> Vec<Declared> {
    let Ok(Value::Object(manifest)) = serde_json::from_str::<Value>(content) else {
        return Vec::new();
    };

    REQUIRE_SECTIONS
        .iter()
        .filter_map(|section| manifest.get(*section).and_then(Value::as_object))
        .flat_map(Map::iter)
        .filter(|(name, _)| !is_platform_requirement(name))
        .filter_map(|(name, range)| range.as_str().map(|r| Declared::new(name.clone(), r)))
        .collect()
}

#[derive(Deserialize)]
struct ComposerLock {
    #[serde(default)]
    packages: Vec<LockedPackage>,
    #[serde(default, rename = "packages-dev")]
    packages_dev: Vec<LockedPackage>,
}

#[derive(Deserialize)]
struct LockedPackage {
    name: String,
    version: String,
}

pub(crate) fn parse_composer_lock(content: &str) -> Locked {
    let Ok(lock) = serde_json::from_str::<ComposerLock>(content) else {
        return Vec::new();
    };

    lock.packages
        .into_iter()
        .chain(lock.packages_dev)
        .map(|p| {
            let version = p.version.strip_prefix('v').unwrap_or(&p.version).to_string();
            (p.name, version)
        })
        .collect()
}
