use crate::health::domain::RepositoryRef;
use crate::shared::Result;
use async_trait::async_trait;

/// Registry metadata needed by the documentation aggregator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryMetadata {
    pub name: String,
    pub latest_version: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub repository_url: Option<String>,
    pub readme: Option<String>,
}

/// DocRepository port for package registry and source repository access
///
/// # Async Support
/// All methods are async so candidate files can be fetched concurrently.
/// Implementations must be `Send + Sync`.
#[async_trait]
pub trait DocRepository: Send + Sync {
    /// Fetches registry metadata for a package
    ///
    /// # Errors
    /// Returns an error if the package does not exist or the registry
    /// cannot be reached; nothing else can be looked up without it.
    async fn fetch_package_metadata(&self, package_name: &str) -> Result<RegistryMetadata>;

    /// Default branch of the repository, if it can be determined
    async fn fetch_default_branch(&self, repo: &RepositoryRef) -> Option<String>;

    /// Raw content of a file at a branch; `None` on any failure
    async fn fetch_raw_file(&self, repo: &RepositoryRef, branch: &str, path: &str) -> Option<String>;
}
