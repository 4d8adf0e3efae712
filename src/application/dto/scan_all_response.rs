use crate::health::domain::ScanResult;
use serde::Serialize;

/// ScanAllResponse - outcome of one background run over every project
///
/// `projects` holds only the projects with migration issues or
/// vulnerabilities; the complete per-project summary goes to the cache.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanAllResponse {
    pub scanned: usize,
    pub failed: usize,
    pub cached_projects: usize,
    pub projects: Vec<ScanResult>,
}
