//! Version string helpers shared by inventory, migration selection and the
//! outdated-delta classifier.
//!
//! Versions across ecosystems are not uniformly semver (`2.0.0rc1`, `v1.22.0`,
//! `1.0.0+incompatible`), so comparison is component-wise on the leading
//! numeric run of each dot-separated part.

use serde::{Deserialize, Serialize};

/// Kind of update between an installed and a latest version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    Major,
    Minor,
    Patch,
}

impl UpdateType {
    /// Classifies the update by the first differing version component.
    ///
    /// Returns `None` when both versions are component-wise equal.
    pub fn classify(current: &str, latest: &str) -> Option<Self> {
        let current = numeric_components(current);
        let latest = numeric_components(latest);
        let len = current.len().max(latest.len());

        (0..len)
            .find(|&i| current.get(i).copied().unwrap_or(0) != latest.get(i).copied().unwrap_or(0))
            .map(|i| match i {
                0 => UpdateType::Major,
                1 => UpdateType::Minor,
                _ => UpdateType::Patch,
            })
    }
}

impl std::fmt::Display for UpdateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateType::Major => write!(f, "major"),
            UpdateType::Minor => write!(f, "minor"),
            UpdateType::Patch => write!(f, "patch"),
        }
    }
}

const RANGE_OPERATORS: [&str; 10] = ["===", "==", "~=", "!=", ">=", "<=", "^", "~", ">", "<"];

/// Strips a declared range down to the version it names.
///
/// `^4.2.1`, `~4.2.1`, `>=4.2.1`, `= 4.2.1` and `v4.2.1` all yield `4.2.1`.
/// Compound ranges keep only their first bound (`>=1.2, <2` -> `1.2`).
pub fn strip_range_operator(range: &str) -> String {
    let mut rest = range.trim();

    loop {
        let before = rest;
        for op in RANGE_OPERATORS {
            if let Some(stripped) = rest.strip_prefix(op) {
                rest = stripped.trim_start();
                break;
            }
        }
        if let Some(stripped) = rest.strip_prefix('=') {
            rest = stripped.trim_start();
        }
        if before == rest {
            break;
        }
    }

    let rest = rest
        .strip_prefix('v')
        .filter(|r| r.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(rest);

    rest.split(|c: char| c.is_whitespace() || c == ',' || c == '|' || c == ';')
        .next()
        .unwrap_or_default()
        .to_string()
}

/// Leading major component of a version or range, if numeric
pub fn major_of(version: &str) -> Option<u64> {
    numeric_components(&strip_range_operator(version))
        .first()
        .copied()
}

fn numeric_components(version: &str) -> Vec<u64> {
    let version = version.trim().trim_start_matches('v');
    version
        .split(['.', '-', '+'])
        .map_while(|part| {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u64>().ok()
        })
        .collect()
}
