use crate::health::domain::Language;
use crate::shared::Result;
use async_trait::async_trait;
use std::path::Path;

/// Raw outdated entry as reported by a native package manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedEntry {
    pub name: String,
    pub current: String,
    pub latest: String,
}

impl OutdatedEntry {
    pub fn new(name: impl Into<String>, current: impl Into<String>, latest: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            current: current.into(),
            latest: latest.into(),
        }
    }
}

/// PackageLister port for listing outdated packages of a project
///
/// Implementations typically shell out to the ecosystem's package manager
/// (`npm outdated --json`, `pip list --outdated --format=json`, ...).
#[async_trait]
pub trait PackageLister: Send + Sync {
    /// Lists packages whose installed version is behind the latest release
    ///
    /// # Errors
    /// Returns an error only when the tool could not be run at all; callers
    /// treat that as "no data".
    async fn list_outdated(&self, project_path: &Path, language: Language) -> Result<Vec<OutdatedEntry>>;
}
