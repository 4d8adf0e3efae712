use async_trait::async_trait;
use dep_health::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock DocRepository serving registry metadata and repository files from memory
#[derive(Default, Clone)]
pub struct MockDocRepository {
    packages: HashMap<String, RegistryMetadata>,
    default_branch: Option<String>,
    files: HashMap<String, String>,
    metadata_calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockDocRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(mut self, metadata: RegistryMetadata) -> Self {
        self.packages.insert(metadata.name.clone(), metadata);
        self
    }

    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = Some(branch.to_string());
        self
    }

    /// Adds a file at `branch:path`
    pub fn with_file(mut self, branch: &str, path: &str, content: &str) -> Self {
        self.files
            .insert(format!("{}:{}", branch, path), content.to_string());
        self
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocRepository for MockDocRepository {
    async fn fetch_package_metadata(&self, package_name: &str) -> Result<RegistryMetadata> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.packages
            .get(package_name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Registry returned 404 for {}", package_name))
    }

    async fn fetch_default_branch(&self, _repo: &RepositoryRef) -> Option<String> {
        self.default_branch.clone()
    }

    async fn fetch_raw_file(&self, _repo: &RepositoryRef, branch: &str, path: &str) -> Option<String> {
        self.files.get(&format!("{}:{}", branch, path)).cloned()
    }
}
