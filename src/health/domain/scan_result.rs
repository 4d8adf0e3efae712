use super::migration::MigrationIssue;
use super::package::Language;
use super::version::UpdateType;
use super::vulnerability::Vulnerability;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Identity of a scanned project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRef {
    pub name: String,
    pub path: PathBuf,
    pub language: Language,
    pub framework: Option<String>,
}

impl ProjectRef {
    pub fn new(name: String, path: PathBuf, language: Language, framework: Option<String>) -> Self {
        Self {
            name,
            path,
            language,
            framework,
        }
    }
}

/// Installed vs latest delta reported by the native package manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutdatedPackage {
    pub name: String,
    pub current: String,
    pub latest: String,
    pub update_type: UpdateType,
}

/// Merged per-project report
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub project: ProjectRef,
    pub current_version: Option<String>,
    pub latest_major: Option<u64>,
    pub package_count: usize,
    pub outdated: Vec<OutdatedPackage>,
    pub migration_needed: bool,
    pub migration_guide: Option<String>,
    pub issues: Vec<MigrationIssue>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub health_score: u8,
    pub scanned_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn outdated_count(&self) -> usize {
        self.outdated.len()
    }

    pub fn major_count(&self) -> usize {
        self.outdated
            .iter()
            .filter(|o| o.update_type == UpdateType::Major)
            .count()
    }

    /// True when the project has something worth acting on in a live summary
    pub fn has_findings(&self) -> bool {
        !self.issues.is_empty() || !self.vulnerabilities.is_empty()
    }
}

/// Flattened summary written to the shared cache file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub project: String,
    pub path: PathBuf,
    pub language: Language,
    pub framework: Option<String>,
    pub outdated_count: usize,
    pub major_count: usize,
    pub security_issues: usize,
    pub score: u8,
    pub timestamp: DateTime<Utc>,
}

impl From<&ScanResult> for CacheEntry {
    fn from(result: &ScanResult) -> Self {
        Self {
            project: result.project.name.clone(),
            path: result.project.path.clone(),
            language: result.project.language,
            framework: result.project.framework.clone(),
            outdated_count: result.outdated_count(),
            major_count: result.major_count(),
            security_issues: result.vulnerabilities.len(),
            score: result.health_score,
            timestamp: result.scanned_at,
        }
    }
}

/// On-disk cache document; replaced as a whole on every background run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheFile {
    pub generated_at: DateTime<Utc>,
    pub run_id: Uuid,
    pub projects: Vec<CacheEntry>,
}

impl CacheFile {
    pub fn new(projects: Vec<CacheEntry>) -> Self {
        Self {
            generated_at: Utc::now(),
            run_id: Uuid::new_v4(),
            projects,
        }
    }
}
