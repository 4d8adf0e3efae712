use async_trait::async_trait;
use dep_health::prelude::*;
use std::collections::HashMap;
use std::path::Path;

/// Mock PackageLister returning canned outdated entries per language
#[derive(Default, Clone)]
pub struct MockPackageLister {
    entries: HashMap<Language, Vec<OutdatedEntry>>,
    should_fail: bool,
}

#[allow(dead_code)]
impl MockPackageLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_outdated(mut self, language: Language, entries: Vec<OutdatedEntry>) -> Self {
        self.entries.insert(language, entries);
        self
    }

    /// Simulates a package manager that is not installed
    pub fn failing() -> Self {
        Self {
            entries: HashMap::new(),
            should_fail: true,
        }
    }
}

#[async_trait]
impl PackageLister for MockPackageLister {
    async fn list_outdated(&self, _project_path: &Path, language: Language) -> Result<Vec<OutdatedEntry>> {
        if self.should_fail {
            anyhow::bail!("{} package manager not found", language);
        }
        Ok(self.entries.get(&language).cloned().unwrap_or_default())
    }
}
