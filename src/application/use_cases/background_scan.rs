use crate::application::dto::{ScanAllRequest, ScanAllResponse};
use crate::application::use_cases::ScanProjectUseCase;
use crate::health::domain::CacheFile;
use crate::health::services::{ProjectDetector, ProjectFilter, ReportMerger};
use crate::ports::outbound::{CacheStore, ManifestReader, PackageLister, ProgressReporter, VulnerabilityIndex};
use crate::shared::{HealthError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Non-reentrant flag shared by every trigger of a full scan.
///
/// A trigger that finds the flag set is rejected, never queued.
#[derive(Debug, Default)]
pub struct ScanGuard {
    running: AtomicBool,
}

impl ScanGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims the guard until the returned permit is dropped
    ///
    /// # Errors
    /// `HealthError::ScanInProgress` while another permit is alive.
    pub fn try_acquire(&self) -> Result<ScanPermit<'_>> {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| HealthError::ScanInProgress)?;
        Ok(ScanPermit { guard: self })
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Releases the guard on drop, including when a scan unwinds
pub struct ScanPermit<'a> {
    guard: &'a ScanGuard,
}

impl Drop for ScanPermit<'_> {
    fn drop(&mut self) {
        self.guard.running.store(false, Ordering::Release);
    }
}

/// BackgroundScanUseCase - scans every discovered project and refreshes the cache
///
/// Projects are scanned one after another by the wrapped
/// [`ScanProjectUseCase`]. A project that fails is reported and skipped.
/// When the run completes the cache is replaced as a whole.
///
/// # Type Parameters
/// * `MR`, `VI`, `PL`, `PR` - see [`ScanProjectUseCase`]
/// * `CS` - CacheStore implementation
pub struct BackgroundScanUseCase<MR, VI, PL, PR, CS> {
    scanner: ScanProjectUseCase<MR, VI, PL, PR>,
    cache_store: CS,
    guard: Arc<ScanGuard>,
}

impl<MR, VI, PL, PR, CS> BackgroundScanUseCase<MR, VI, PL, PR, CS>
where
    MR: ManifestReader,
    VI: VulnerabilityIndex,
    PL: PackageLister,
    PR: ProgressReporter,
    CS: CacheStore,
{
    pub fn new(scanner: ScanProjectUseCase<MR, VI, PL, PR>, cache_store: CS, guard: Arc<ScanGuard>) -> Self {
        Self {
            scanner,
            cache_store,
            guard,
        }
    }

    /// Executes one full run
    ///
    /// # Errors
    /// - `HealthError::ScanInProgress` if a run is already active
    /// - invalid exclude patterns
    /// - `HealthError::CacheWriteError` if the cache cannot be replaced
    pub async fn execute(&self, request: ScanAllRequest) -> Result<ScanAllResponse> {
        let _permit = self.guard.try_acquire()?;
        let reporter = self.scanner.progress_reporter();

        // Step 1: Discover projects
        let filter = ProjectFilter::new(request.exclude_projects)?;
        let projects = ProjectDetector::new(self.scanner.manifest_reader())
            .with_max_depth(request.max_depth)
            .discover(&request.roots, &filter);
        reporter.report(&format!("🗂️  Discovered {} project(s)", projects.len()));

        // Step 2: Scan sequentially
        let total = projects.len();
        let mut results = Vec::with_capacity(total);
        let mut failed = 0;
        for (index, project) in projects.into_iter().enumerate() {
            let name = project.name.clone();
            reporter.report_progress(index, total, Some(&name));
            match self.scanner.scan(project).await {
                Ok(result) => results.push(result),
                Err(e) => {
                    failed += 1;
                    tracing::warn!(project = %name, error = %e, "project scan failed");
                    reporter.report_error(&format!("Skipping {}: {}", name, e));
                }
            }
        }
        reporter.report_progress(total, total, None);

        // Step 3: Replace the cache
        let entries = ReportMerger::cache_entries(&results);
        let cached_projects = entries.len();
        self.cache_store.write(&CacheFile::new(entries))?;

        let projects: Vec<_> = ReportMerger::actionable_results(&results)
            .into_iter()
            .cloned()
            .collect();
        reporter.report_completion(&format!(
            "✅ Scanned {} project(s); {} need attention",
            results.len(),
            projects.len()
        ));

        Ok(ScanAllResponse {
            scanned: results.len(),
            failed,
            cached_projects,
            projects,
        })
    }
}
