use async_trait::async_trait;
use dep_health::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock VulnerabilityIndex keyed by package name
#[derive(Default, Clone)]
pub struct MockVulnerabilityIndex {
    advisories: HashMap<String, Vec<Vulnerability>>,
    queried: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockVulnerabilityIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_advisory(mut self, package: &str, id: &str, severity: Severity) -> Self {
        self.advisories
            .entry(package.to_string())
            .or_default()
            .push(Vulnerability {
                id: id.to_string(),
                summary: format!("Advisory {} for {}", id, package),
                severity,
                affected_package: package.to_string(),
                affected_range: ">=0".to_string(),
                fixed_version: None,
                url: format!("https://osv.dev/vulnerability/{}", id),
                published: None,
            });
        self
    }

    /// Number of packages looked up so far
    pub fn queried_packages(&self) -> usize {
        self.queried.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VulnerabilityIndex for MockVulnerabilityIndex {
    async fn query(&self, packages: &[Package]) -> Vec<Vec<Vulnerability>> {
        self.queried.fetch_add(packages.len(), Ordering::SeqCst);
        packages
            .iter()
            .map(|p| self.advisories.get(p.name()).cloned().unwrap_or_default())
            .collect()
    }
}
