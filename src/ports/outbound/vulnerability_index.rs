use crate::health::domain::{Package, Vulnerability};
use async_trait::async_trait;

/// VulnerabilityIndex port for querying advisories of installed packages
///
/// Failures are absorbed by the implementation: a batch that cannot be
/// fetched contributes empty results rather than an error.
#[async_trait]
pub trait VulnerabilityIndex: Send + Sync {
    /// Queries advisories for every package.
    ///
    /// The returned vector is positional: `result[i]` holds the
    /// advisories of `packages[i]`.
    async fn query(&self, packages: &[Package]) -> Vec<Vec<Vulnerability>>;

    /// Flattened list of every advisory affecting the given packages
    async fn fetch_vulnerabilities(&self, packages: &[Package]) -> Vec<Vulnerability> {
        self.query(packages).await.into_iter().flatten().collect()
    }
}
