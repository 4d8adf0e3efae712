//! go.mod

use super::{resolve, Locked, PackageInventory};
use crate::health::domain::{Ecosystem, Package};
use crate::ports::outbound::ManifestReader;
use std::path::Path;

pub(super) fn collect<R: ManifestReader + ?Sized>(
    inventory: &PackageInventory<'_, R>,
    project_path: &Path,
) -> Vec<Package> {
    let required = inventory
        .read(project_path, "go.mod")
        .map(|content| parse_go_mod(&content))
        .unwrap_or_default();

    // go.mod pins exact versions, so it doubles as the resolved list
    resolve(Ecosystem::Go, Vec::new(), |_| None, required)
}

/// `require` entries of a go.mod, both single-line and block form
pub(crate) fn parse_go_mod(content: &str) -> Locked {
    let mut required = Vec::new();
    let mut in_block = false;

    for line in content.lines() {
        let line = line.split("//").next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        let entry = if in_block {
            if line == ")" {
                in_block = false;
                continue;
            }
            line
        } else if let Some(rest) = line.strip_prefix("require") {
            let rest = rest.trim();
            if rest == "(" {
                in_block = true;
                continue;
            }
            rest
        } else {
            continue;
        };

        let mut parts = entry.split_whitespace();
        if let (Some(module), Some(version)) = (parts.next(), parts.next()) {
            let version = version.strip_prefix('v').unwrap_or(version);
            required.push((module.to_string(), version.to_string()));
        }
    }

    required
}
