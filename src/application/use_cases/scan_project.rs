use crate::application::dto::ScanRequest;
use crate::health::domain::{Language, MigrationReport, Package, ProjectRef, ScanResult, Vulnerability};
use crate::health::rules::framework_package;
use crate::health::services::{detect_framework, MigrationScanner, PackageInventory, ProjectDetector};
use crate::health::services::{ReportMerger, ScanParts};
use crate::ports::outbound::{ManifestReader, OutdatedEntry, PackageLister, ProgressReporter, VulnerabilityIndex};
use crate::shared::{HealthError, Result};
use std::collections::HashSet;
use std::path::Path;

/// ScanProjectUseCase - Core use case for scanning one project
///
/// Orchestrates the enrichment pipeline: the package inventory is built
/// first, then the vulnerability lookup, the outdated listing and the
/// migration scan run concurrently, and the report merger combines them.
/// Only an unusable project path is an error; every other source that
/// fails contributes no data.
///
/// # Type Parameters
/// * `MR` - ManifestReader implementation
/// * `VI` - VulnerabilityIndex implementation
/// * `PL` - PackageLister implementation
/// * `PR` - ProgressReporter implementation
pub struct ScanProjectUseCase<MR, VI, PL, PR> {
    manifest_reader: MR,
    vulnerability_index: VI,
    package_lister: PL,
    progress_reporter: PR,
    ignored_advisories: HashSet<String>,
}

impl<MR, VI, PL, PR> ScanProjectUseCase<MR, VI, PL, PR>
where
    MR: ManifestReader,
    VI: VulnerabilityIndex,
    PL: PackageLister,
    PR: ProgressReporter,
{
    /// Creates a new ScanProjectUseCase with injected dependencies
    pub fn new(manifest_reader: MR, vulnerability_index: VI, package_lister: PL, progress_reporter: PR) -> Self {
        Self {
            manifest_reader,
            vulnerability_index,
            package_lister,
            progress_reporter,
            ignored_advisories: HashSet::new(),
        }
    }

    /// Advisory ids dropped from every result (accepted risks)
    pub fn with_ignored_advisories(mut self, ids: impl IntoIterator<Item = String>) -> Self {
        self.ignored_advisories = ids.into_iter().collect();
        self
    }

    pub fn progress_reporter(&self) -> &PR {
        &self.progress_reporter
    }

    pub fn manifest_reader(&self) -> &MR {
        &self.manifest_reader
    }

    /// Executes the scan for the project named in the request
    ///
    /// # Errors
    /// Returns `HealthError::InvalidProjectPath` when the path is not a
    /// directory or no supported manifest is found and no language is given.
    pub async fn execute(&self, request: ScanRequest) -> Result<ScanResult> {
        let project = self.resolve_project(&request)?;
        self.scan(project).await
    }

    /// Scans an already detected project
    pub async fn scan(&self, project: ProjectRef) -> Result<ScanResult> {
        self.progress_reporter.report(&format!(
            "🔍 Scanning {} ({}) at {}",
            project.name,
            project.language,
            project.path.display()
        ));

        // Step 1: Inventory
        let packages = PackageInventory::new(&self.manifest_reader).collect(&project.path, project.language);
        self.progress_reporter
            .report(&format!("📦 Found {} installed package(s)", packages.len()));

        // Step 2: Enrich concurrently
        let framework_version = Self::framework_version(&project, &packages);
        let (vulnerabilities, outdated, migration) = tokio::join!(
            self.fetch_vulnerabilities(&packages),
            self.list_outdated(&project.path, project.language),
            Self::scan_migration(&project, framework_version),
        );

        // Step 3: Merge
        let result = ReportMerger::merge(ScanParts {
            project,
            packages,
            outdated,
            vulnerabilities,
            migration,
        });

        tracing::info!(
            project = %result.project.name,
            score = result.health_score,
            outdated = result.outdated_count(),
            vulnerabilities = result.vulnerabilities.len(),
            issues = result.issues.len(),
            "project scanned"
        );
        Ok(result)
    }

    /// Detects the project at the request path, applying overrides
    fn resolve_project(&self, request: &ScanRequest) -> Result<ProjectRef> {
        let path = &request.project_path;
        if !path.is_dir() {
            return Err(HealthError::InvalidProjectPath {
                path: path.clone(),
                reason: "Not a directory".to_string(),
            }
            .into());
        }

        let detected = ProjectDetector::new(&self.manifest_reader).detect(path);
        let mut project = match (detected, request.language) {
            (Some(mut project), Some(language)) => {
                project.language = language;
                project
            }
            (Some(project), None) => project,
            (None, Some(language)) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let framework = match language {
                    Language::Node => self
                        .manifest_reader
                        .read_manifest(path, "package.json")
                        .ok()
                        .and_then(|content| detect_framework(&content)),
                    _ => None,
                };
                ProjectRef::new(name, path.clone(), language, framework)
            }
            (None, None) => {
                return Err(HealthError::InvalidProjectPath {
                    path: path.clone(),
                    reason: "No supported manifest found (package.json, Cargo.toml, go.mod, \
                             composer.json, pyproject.toml or requirements.txt)"
                        .to_string(),
                }
                .into())
            }
        };

        if let Some(framework) = &request.framework {
            project.framework = Some(framework.clone());
        }
        Ok(project)
    }

    /// Installed version of the package that governs the framework
    fn framework_version(project: &ProjectRef, packages: &[Package]) -> Option<String> {
        let governing = framework_package(project.framework.as_deref()?);
        packages
            .iter()
            .find(|p| p.name() == governing)
            .map(|p| p.version().to_string())
    }

    async fn fetch_vulnerabilities(&self, packages: &[Package]) -> Vec<Vulnerability> {
        let mut vulnerabilities = self.vulnerability_index.fetch_vulnerabilities(packages).await;
        if !self.ignored_advisories.is_empty() {
            let before = vulnerabilities.len();
            vulnerabilities.retain(|v| !self.ignored_advisories.contains(&v.id));
            tracing::debug!(ignored = before - vulnerabilities.len(), "ignored advisories removed");
        }
        vulnerabilities
    }

    async fn list_outdated(&self, project_path: &Path, language: Language) -> Vec<OutdatedEntry> {
        match self.package_lister.list_outdated(project_path, language).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    project = %project_path.display(),
                    %language,
                    error = %e,
                    "outdated listing unavailable"
                );
                self.progress_reporter
                    .report_error(&format!("Outdated packages unavailable: {}", e));
                Vec::new()
            }
        }
    }

    /// Runs the file-system heavy migration scan off the async workers
    async fn scan_migration(project: &ProjectRef, current_version: Option<String>) -> MigrationReport {
        let root = project.path.clone();
        let framework = project.framework.clone();
        let version = current_version.clone();

        let handle = tokio::task::spawn_blocking(move || {
            MigrationScanner::default().scan(&root, framework.as_deref(), version.as_deref())
        });

        match handle.await {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(project = %project.name, error = %e, "migration scan aborted");
                MigrationReport::not_needed(project.framework.clone(), current_version)
            }
        }
    }
}
