//! Parsers for the JSON each package manager prints for "what is outdated".
//!
//! Entries without both an installed and a latest version are dropped;
//! a leading `v` is stripped from versions.

use crate::ports::outbound::OutdatedEntry;
use crate::shared::Result;
use serde::Deserialize;
use serde_json::{Map, Value};

fn strip_v(version: &str) -> &str {
    version
        .strip_prefix('v')
        .filter(|rest| rest.starts_with(|c: char| c.is_ascii_digit()))
        .unwrap_or(version)
}

fn entry(name: &str, current: &str, latest: &str) -> OutdatedEntry {
    OutdatedEntry::new(name, strip_v(current), strip_v(latest))
}

/// `npm outdated --json`: `{ "<name>": { "current", "wanted", "latest" } }`.
/// Workspaces report an array of such objects per package; the first wins.
pub fn parse_npm(stdout: &str) -> Result<Vec<OutdatedEntry>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    let packages: Map<String, Value> = serde_json::from_str(stdout)?;

    Ok(packages
        .iter()
        .filter_map(|(name, info)| {
            let info = match info {
                Value::Array(items) => items.first()?,
                other => other,
            };
            let current = info.get("current")?.as_str()?;
            let latest = info.get("latest")?.as_str()?;
            Some(entry(name, current, latest))
        })
        .collect())
}

#[derive(Deserialize)]
struct PipOutdated {
    name: String,
    version: String,
    latest_version: String,
}

/// `pip list --outdated --format=json`
pub fn parse_pip(stdout: &str) -> Result<Vec<OutdatedEntry>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    let packages: Vec<PipOutdated> = serde_json::from_str(stdout)?;
    Ok(packages
        .iter()
        .map(|p| entry(&p.name, &p.version, &p.latest_version))
        .collect())
}

#[derive(Deserialize)]
struct CargoOutdated {
    #[serde(default)]
    dependencies: Vec<CargoOutdatedDependency>,
}

#[derive(Deserialize)]
struct CargoOutdatedDependency {
    name: String,
    project: String,
    latest: String,
}

/// `cargo outdated --format json`. Crates whose latest is `---` or `Removed`
/// have no comparable version and are skipped. A stream cut short after the
/// first document keeps what was parsed.
pub fn parse_cargo(stdout: &str) -> Result<Vec<OutdatedEntry>> {
    let mut entries = Vec::new();
    // cargo-outdated prints one document per workspace member
    for (index, document) in serde_json::Deserializer::from_str(stdout)
        .into_iter::<CargoOutdated>()
        .enumerate()
    {
        let document = match document {
            Ok(document) => document,
            Err(e) if index == 0 => return Err(e.into()),
            Err(e) => {
                tracing::debug!(error = %e, parsed = index, "cargo outdated output cut short");
                break;
            }
        };
        for dep in document.dependencies {
            if dep.latest.starts_with(|c: char| c.is_ascii_digit()) {
                entries.push(entry(&dep.name, &dep.project, &dep.latest));
            }
        }
    }
    Ok(entries)
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoModule {
    path: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    update: Option<GoUpdate>,
    #[serde(default)]
    main: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct GoUpdate {
    version: String,
}

/// `go list -u -m -json all`: a stream of module objects, not an array.
/// Output cut short after the first object keeps what was parsed.
pub fn parse_go(stdout: &str) -> Result<Vec<OutdatedEntry>> {
    let mut entries = Vec::new();
    for (index, module) in serde_json::Deserializer::from_str(stdout)
        .into_iter::<GoModule>()
        .enumerate()
    {
        let module = match module {
            Ok(module) => module,
            Err(e) if index == 0 => return Err(e.into()),
            Err(e) => {
                tracing::debug!(error = %e, parsed = index, "go list output cut short");
                break;
            }
        };
        if module.main {
            continue;
        }
        if let (Some(current), Some(update)) = (module.version.as_deref(), module.update.as_ref()) {
            entries.push(entry(&module.path, current, &update.version));
        }
    }
    Ok(entries)
}

#[derive(Deserialize)]
struct ComposerOutdated {
    #[serde(default)]
    installed: Vec<ComposerPackage>,
}

#[derive(Deserialize)]
struct ComposerPackage {
    name: String,
    version: String,
    #[serde(default)]
    latest: Option<String>,
}

/// `composer outdated --format=json`
pub fn parse_composer(stdout: &str) -> Result<Vec<OutdatedEntry>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }
    let report: ComposerOutdated = serde_json::from_str(stdout)?;
    Ok(report
        .installed
        .iter()
        .filter_map(|p| Some(entry(&p.name, &p.version, p.latest.as_deref()?)))
        .collect())
}
