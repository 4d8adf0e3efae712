//! requirements.txt / pyproject.toml / uv.lock / poetry.lock

use super::{lock_index, resolve, Declared, Locked, PackageInventory};
use crate::health::domain::{Ecosystem, Package};
use crate::ports::outbound::ManifestReader;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

const LOCKFILES: [&str; 2] = ["uv.lock", "poetry.lock"];

pub(super) fn collect<R: ManifestReader + ?Sized>(
    inventory: &PackageInventory<'_, R>,
    project_path: &Path,
) -> Vec<Package> {
    let mut declared = Vec::new();
    if let Some(content) = inventory.read(project_path, "requirements.txt") {
        declared.extend(parse_requirements(&content));
    }
    if let Some(content) = inventory.read(project_path, "pyproject.toml") {
        declared.extend(parse_pyproject(&content));
    }

    let locked = LOCKFILES
        .iter()
        .find_map(|file| inventory.read(project_path, file))
        .map(|content| parse_lock(&content))
        .unwrap_or_default();
    let lock = lock_index(&locked, normalize_name);

    resolve(
        Ecosystem::PyPi,
        declared,
        |name| lock.get(&normalize_name(name)).cloned(),
        locked,
    )
}

/// PEP 503 name normalization
fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(['_', '.'], "-")
}

fn requirement_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z0-9][A-Za-z0-9._-]*)\s*(?:\[[^\]]*\])?\s*([^;#]*)")
            .expect("requirement regex is valid")
    })
}

/// Parses one PEP 508 requirement (`requests[socks]>=2.31 ; python_version>"3.8"`)
fn parse_requirement(line: &str) -> Option<Declared> {
    let caps = requirement_regex().captures(line)?;
    let name = caps.get(1)?.as_str();
    let range = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();
    Some(Declared::new(name, range))
}

/// Pinned and ranged requirements of a requirements.txt
pub(crate) fn parse_requirements(content: &str) -> Vec<Declared> {
    content
        .lines()
        .map(|line| line.split('#').next().unwrap_or_default().trim())
        .filter(|line| !line.is_empty() && !line.starts_with('-'))
        .filter(|line| !line.contains("://"))
        .filter_map(parse_requirement)
        .collect()
}

#[derive(Deserialize, Default)]
struct PyProject {
    #[serde(default)]
    project: Option<ProjectTable>,
    #[serde(default)]
    tool: Option<ToolTable>,
}

#[derive(Deserialize, Default)]
struct ProjectTable {
    #[serde(default)]
    dependencies: Vec<String>,
}

#[derive(Deserialize, Default)]
struct ToolTable {
    #[serde(default)]
    poetry: Option<PoetryTable>,
}

#[derive(Deserialize, Default)]
struct PoetryTable {
    #[serde(default)]
    dependencies: toml::Table,
}

/// PEP 621 and Poetry dependency declarations of a pyproject.toml
pub(crate) fn parse_pyproject(content: &str) -> Vec<Declared> {
    let Ok(pyproject) = toml::from_str::<PyProject>(content) else {
        return Vec::new();
    };

    let pep621 = pyproject
        .project
        .map(|p| p.dependencies)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|req| parse_requirement(&req));

    let poetry = pyproject
        .tool
        .and_then(|t| t.poetry)
        .map(|p| p.dependencies)
        .unwrap_or_default()
        .into_iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case("python"))
        .filter_map(|(name, spec)| {
            let range = match spec {
                toml::Value::String(s) => s,
                toml::Value::Table(t) => t
                    .get("version")
                    .and_then(toml::Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                _ => return None,
            };
            Some(Declared::new(name, range))
        });

    pep621.chain(poetry).collect()
}

#[derive(Deserialize)]
struct PythonLock {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Deserialize)]
struct LockedPackage {
    name: String,
    version: Option<String>,
    #[serde(default)]
    source: Option<toml::Value>,
}

/// Registry packages of a uv.lock or poetry.lock
pub(crate) fn parse_lock(content: &str) -> Locked {
    let Ok(lock) = toml::from_str::<PythonLock>(content) else {
        return Vec::new();
    };

    lock.package
        .into_iter()
        .filter(|p| !is_local_source(p.source.as_ref()))
        .filter_map(|p| Some((p.name, p.version?)))
        .collect()
}

/// uv marks the project itself as `source = { virtual = "." }` or `{ editable = "." }`
fn is_local_source(source: Option<&toml::Value>) -> bool {
    source
        .and_then(toml::Value::as_table)
        .is_some_and(|t| t.contains_key("virtual") || t.contains_key("editable"))
}
