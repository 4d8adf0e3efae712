use crate::application::dto::DocsRequest;
use crate::health::domain::{DocsReport, RepositoryRef};
use crate::health::services::{doc_text, parse_github_repository};
use crate::ports::outbound::DocRepository;
use crate::shared::{HealthError, Result};
use futures::future::join_all;
use tokio::sync::OnceCell;

/// A registry README shorter than this is treated as a stub
const REGISTRY_README_MIN_CHARS: usize = 100;
/// A repository README shorter than this is treated as a stub
const REPOSITORY_README_MIN_CHARS: usize = 50;

/// Branches probed, in order, when the default branch is unknown
const FALLBACK_BRANCHES: [&str; 2] = ["main", "master"];

const README_FILES: [&str; 5] = ["README.md", "readme.md", "Readme.md", "README", "README.rst"];

const CHANGELOG_FILES: [&str; 7] = [
    "CHANGELOG.md",
    "changelog.md",
    "Changelog.md",
    "CHANGES.md",
    "changes.md",
    "HISTORY.md",
    "history.md",
];

const MIGRATION_FILES: [&str; 4] = ["MIGRATION.md", "MIGRATING.md", "UPGRADING.md", "UPGRADE.md"];

/// Migration guides that live at non-standard paths in their repositories
const KNOWN_MIGRATION_GUIDES: [(&str, &str); 3] = [
    ("svelte", "documentation/docs/07-misc/07-v5-migration-guide.md"),
    ("@sveltejs/kit", "documentation/docs/60-appendix/30-migrating-to-sveltekit-2.md"),
    ("eslint", "docs/src/use/migrate-to-9.0.0.md"),
];

/// DocumentationAggregator - collects readable documentation for a package
///
/// Starts from the registry metadata, resolves the GitHub repository it
/// points to and fetches the README, changelog and migration guide from it.
/// Candidate files of a section are fetched concurrently and the first one
/// in priority order wins. Only a failed registry lookup is an error.
pub struct DocumentationAggregator<R: DocRepository> {
    repository: R,
}

impl<R: DocRepository> DocumentationAggregator<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Executes the documentation lookup
    ///
    /// # Errors
    /// `HealthError::PackageNotFound` when the registry has no such package
    /// or cannot be reached.
    pub async fn execute(&self, request: DocsRequest) -> Result<DocsReport> {
        // Step 1: Registry metadata
        let metadata = self
            .repository
            .fetch_package_metadata(&request.package_name)
            .await
            .map_err(|e| HealthError::PackageNotFound {
                name: request.package_name.clone(),
                details: format!("{:#}", e),
            })?;

        // Step 2: Source repository
        let repo = metadata.repository_url.as_deref().and_then(parse_github_repository);
        if repo.is_none() {
            tracing::debug!(
                package = %request.package_name,
                repository = ?metadata.repository_url,
                "no GitHub repository; skipping changelog and migration guide"
            );
        }
        // Looked up on first use only
        let branches = OnceCell::new();

        // Step 3: Sections
        let section = request.section;
        let registry_readme = metadata
            .readme
            .clone()
            .filter(|text| text.trim().chars().count() > REGISTRY_README_MIN_CHARS);

        let readme = async {
            if !section.includes_readme() {
                return None;
            }
            if registry_readme.is_some() {
                return registry_readme.clone();
            }
            let repo = repo.as_ref()?;
            let candidates: Vec<String> = README_FILES.iter().map(|f| f.to_string()).collect();
            self.first_found(repo, &branches, &candidates, REPOSITORY_README_MIN_CHARS)
                .await
        };
        let changelog = async {
            let repo = repo.as_ref().filter(|_| section.includes_changelog())?;
            let candidates = changelog_candidates(&request.package_name);
            self.first_found(repo, &branches, &candidates, 0).await
        };
        let migration_guide = async {
            let repo = repo.as_ref().filter(|_| section.includes_migration())?;
            let candidates = migration_candidates(&request.package_name);
            self.first_found(repo, &branches, &candidates, 0).await
        };
        let (readme, changelog, migration_guide) = tokio::join!(readme, changelog, migration_guide);

        let query = request.query.as_deref();
        let prepare = |text: Option<String>| text.map(|t| doc_text::prepare(&t, query));

        Ok(DocsReport {
            name: metadata.name,
            latest_version: metadata.latest_version,
            description: metadata.description,
            homepage: metadata.homepage,
            repository: repo.as_ref().map(RepositoryRef::web_url).or(metadata.repository_url),
            readme: prepare(readme),
            changelog: prepare(changelog),
            migration_guide: prepare(migration_guide),
        })
    }

    /// The default branch when the API knows it, else the probe order
    async fn branches_for(&self, repo: &RepositoryRef) -> Vec<String> {
        match self.repository.fetch_default_branch(repo).await {
            Some(branch) => vec![branch],
            None => FALLBACK_BRANCHES.iter().map(|b| b.to_string()).collect(),
        }
    }

    /// First candidate, in priority order, longer than `min_chars`
    ///
    /// All candidates of a branch are requested together; the next branch
    /// is only tried when none of them qualifies.
    async fn first_found(
        &self,
        repo: &RepositoryRef,
        branches: &OnceCell<Vec<String>>,
        candidates: &[String],
        min_chars: usize,
    ) -> Option<String> {
        let branches = branches.get_or_init(|| self.branches_for(repo)).await;
        for branch in branches {
            let fetches = candidates
                .iter()
                .map(|path| self.repository.fetch_raw_file(repo, branch, path));
            let found = join_all(fetches)
                .await
                .into_iter()
                .flatten()
                .find(|text| {
                    let trimmed = text.trim();
                    !trimmed.is_empty() && trimmed.chars().count() > min_chars
                });
            if found.is_some() {
                return found;
            }
        }
        None
    }
}

/// `@scope/name` -> `name`; unscoped names are returned unchanged
fn basename(package_name: &str) -> &str {
    package_name.rsplit('/').next().unwrap_or(package_name)
}

fn changelog_candidates(package_name: &str) -> Vec<String> {
    let mut candidates: Vec<String> = CHANGELOG_FILES.iter().map(|f| f.to_string()).collect();
    if package_name.starts_with('@') {
        let base = basename(package_name);
        candidates.extend(CHANGELOG_FILES.iter().map(|f| format!("packages/{}/{}", base, f)));
    }
    candidates
}

fn migration_candidates(package_name: &str) -> Vec<String> {
    let mut candidates: Vec<String> = KNOWN_MIGRATION_GUIDES
        .iter()
        .filter(|(name, _)| *name == package_name)
        .map(|(_, path)| path.to_string())
        .collect();
    candidates.extend(MIGRATION_FILES.iter().map(|f| f.to_string()));
    let base = basename(package_name);
    candidates.extend(MIGRATION_FILES.iter().map(|f| format!("packages/{}/{}", base, f)));
    candidates
}
