use crate::health::domain::RepositoryRef;
use crate::ports::outbound::{DocRepository, RegistryMetadata};
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const REGISTRY_URL: &str = "https://registry.npmjs.org";
const RAW_CONTENT_URL: &str = "https://raw.githubusercontent.com";
const GITHUB_API_URL: &str = "https://api.github.com";

const REGISTRY_TIMEOUT_SECONDS: u64 = 10;
const GITHUB_TIMEOUT_SECONDS: u64 = 8;

/// Placeholder the registry stores for packages published without a README
const MISSING_README: &str = "ERROR: No README data found!";

#[derive(Debug, Deserialize)]
struct NpmPackument {
    name: String,
    #[serde(default, rename = "dist-tags")]
    dist_tags: Option<DistTags>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    repository: Option<NpmRepository>,
    #[serde(default)]
    readme: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DistTags {
    #[serde(default)]
    latest: Option<String>,
}

/// `repository` is either a bare string or `{ "type": "git", "url": "..." }`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NpmRepository {
    Url(String),
    Object {
        #[serde(default)]
        url: Option<String>,
    },
}

impl NpmRepository {
    fn into_url(self) -> Option<String> {
        match self {
            NpmRepository::Url(url) => Some(url),
            NpmRepository::Object { url } => url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GitHubRepo {
    default_branch: Option<String>,
}

/// NpmDocRepository adapter for the npm registry and GitHub
///
/// Implements the DocRepository port: package metadata comes from
/// registry.npmjs.org, file contents from raw.githubusercontent.com and the
/// default branch from the GitHub repos API. No authentication is sent, so
/// the GitHub API is subject to anonymous rate limits; a rejected lookup
/// simply yields no branch.
pub struct NpmDocRepository {
    client: reqwest::Client,
    registry_url: String,
}

impl NpmDocRepository {
    pub fn new() -> Result<Self> {
        let user_agent = format!("dep-health/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REGISTRY_TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            registry_url: REGISTRY_URL.to_string(),
        })
    }

    /// Validates a package name before it becomes part of a URL
    fn validate_package_name(name: &str) -> Result<()> {
        if name.is_empty() || name.len() > 214 {
            anyhow::bail!("Invalid npm package name length: {}", name.len());
        }
        if name.contains("..") || name.contains('\\') || name.contains('#') || name.contains('?') {
            anyhow::bail!("Security: package name '{}' contains URL-unsafe characters", name);
        }
        let slashes = name.matches('/').count();
        if slashes > 1 || (slashes == 1 && !name.starts_with('@')) {
            anyhow::bail!("Invalid npm package name: '{}'", name);
        }
        Ok(())
    }

    /// Registry path of a package; the scope separator is escaped
    fn package_path(name: &str) -> String {
        match name.split_once('/') {
            Some((scope, bare)) => format!(
                "@{}%2F{}",
                urlencoding::encode(scope.trim_start_matches('@')),
                urlencoding::encode(bare)
            ),
            None => urlencoding::encode(name).into_owned(),
        }
    }

    /// Encodes each segment of a repository file path
    fn encode_file_path(path: &str) -> String {
        path.split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[async_trait]
impl DocRepository for NpmDocRepository {
    async fn fetch_package_metadata(&self, package_name: &str) -> Result<RegistryMetadata> {
        Self::validate_package_name(package_name)?;
        let url = format!("{}/{}", self.registry_url, Self::package_path(package_name));

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            anyhow::bail!("npm registry returned status code {}", response.status());
        }
        let packument: NpmPackument = response.json().await?;

        Ok(RegistryMetadata {
            name: packument.name,
            latest_version: packument.dist_tags.and_then(|t| t.latest),
            description: packument.description,
            homepage: packument.homepage,
            repository_url: packument.repository.and_then(NpmRepository::into_url),
            readme: packument
                .readme
                .filter(|r| !r.trim().is_empty() && r.trim() != MISSING_README),
        })
    }

    async fn fetch_default_branch(&self, repo: &RepositoryRef) -> Option<String> {
        let url = format!(
            "{}/repos/{}/{}",
            GITHUB_API_URL,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name)
        );
        let result = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .timeout(Duration::from_secs(GITHUB_TIMEOUT_SECONDS))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => response
                .json::<GitHubRepo>()
                .await
                .ok()
                .and_then(|r| r.default_branch),
            Ok(response) => {
                tracing::debug!(repo = %repo.web_url(), status = %response.status(), "default branch lookup rejected");
                None
            }
            Err(e) => {
                tracing::debug!(repo = %repo.web_url(), error = %e, "default branch lookup failed");
                None
            }
        }
    }

    async fn fetch_raw_file(&self, repo: &RepositoryRef, branch: &str, path: &str) -> Option<String> {
        let url = format!(
            "{}/{}/{}/{}/{}",
            RAW_CONTENT_URL,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name),
            Self::encode_file_path(branch),
            Self::encode_file_path(path)
        );
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(GITHUB_TIMEOUT_SECONDS))
            .send()
            .await
            .map_err(|e| tracing::debug!(url = %url, error = %e, "raw file fetch failed"))
            .ok()?;

        if !response.status().is_success() {
            return None;
        }
        response.text().await.ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(NpmDocRepository::new().is_ok());
    }

    #[test]
    fn test_package_path_escapes_scope() {
        assert_eq!(NpmDocRepository::package_path("svelte"), "svelte");
        assert_eq!(NpmDocRepository::package_path("@sveltejs/kit"), "@sveltejs%2Fkit");
    }

    #[test]
    fn test_validate_package_name() {
        assert!(NpmDocRepository::validate_package_name("react").is_ok());
        assert!(NpmDocRepository::validate_package_name("@angular/core").is_ok());
        assert!(NpmDocRepository::validate_package_name("").is_err());
        assert!(NpmDocRepository::validate_package_name("../etc").is_err());
        assert!(NpmDocRepository::validate_package_name("a/b").is_err());
        assert!(NpmDocRepository::validate_package_name("@a/b/c").is_err());
    }

    #[test]
    fn test_encode_file_path_keeps_separators() {
        assert_eq!(
            NpmDocRepository::encode_file_path("documentation/docs/07-misc/Migration Guide.md"),
            "documentation/docs/07-misc/Migration%20Guide.md"
        );
    }

    #[test]
    fn test_packument_repository_forms() {
        let object: NpmPackument = serde_json::from_str(
            r#"{"name":"svelte","dist-tags":{"latest":"5.1.0"},"repository":{"type":"git","url":"git+https://github.com/sveltejs/svelte.git"},"readme":"ERROR: No README data found!"}"#,
        )
        .unwrap();
        assert_eq!(
            object.repository.and_then(NpmRepository::into_url).as_deref(),
            Some("git+https://github.com/sveltejs/svelte.git")
        );
        assert_eq!(object.dist_tags.and_then(|t| t.latest).as_deref(), Some("5.1.0"));

        let bare: NpmPackument =
            serde_json::from_str(r#"{"name":"x","repository":"github:owner/x"}"#).unwrap();
        assert_eq!(
            bare.repository.and_then(NpmRepository::into_url).as_deref(),
            Some("github:owner/x")
        );
    }

    // Integration tests - require network access
    // #[tokio::test]
    // async fn test_fetch_package_metadata_real() {
    //     let repo = NpmDocRepository::new().unwrap();
    //     let metadata = repo.fetch_package_metadata("svelte").await.unwrap();
    //     assert!(metadata.repository_url.is_some());
    // }
}
