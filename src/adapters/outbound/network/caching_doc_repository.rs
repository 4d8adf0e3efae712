use crate::health::domain::RepositoryRef;
use crate::ports::outbound::{DocRepository, RegistryMetadata};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingDocRepository wraps a DocRepository and caches registry metadata
/// and default branches in memory.
///
/// Decorator over any DocRepository; the cache is shared across clones of the
/// `Arc` and safe for concurrent access. Failed lookups are not cached. Raw
/// file fetches pass straight through.
pub struct CachingDocRepository<R: DocRepository> {
    inner: R,
    metadata: Arc<DashMap<String, RegistryMetadata>>,
    branches: Arc<DashMap<RepositoryRef, String>>,
}

impl<R: DocRepository> CachingDocRepository<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            metadata: Arc::new(DashMap::new()),
            branches: Arc::new(DashMap::new()),
        }
    }

    /// Number of cached registry documents
    pub fn cache_size(&self) -> usize {
        self.metadata.len()
    }
}

#[async_trait]
impl<R: DocRepository> DocRepository for CachingDocRepository<R> {
    async fn fetch_package_metadata(&self, package_name: &str) -> Result<RegistryMetadata> {
        if let Some(cached) = self.metadata.get(package_name) {
            return Ok(cached.clone());
        }

        let metadata = self.inner.fetch_package_metadata(package_name).await?;
        self.metadata
            .insert(package_name.to_string(), metadata.clone());
        Ok(metadata)
    }

    async fn fetch_default_branch(&self, repo: &RepositoryRef) -> Option<String> {
        if let Some(cached) = self.branches.get(repo) {
            return Some(cached.clone());
        }

        let branch = self.inner.fetch_default_branch(repo).await?;
        self.branches.insert(repo.clone(), branch.clone());
        Some(branch)
    }

    async fn fetch_raw_file(&self, repo: &RepositoryRef, branch: &str, path: &str) -> Option<String> {
        self.inner.fetch_raw_file(repo, branch, path).await
    }
}
