use crate::health::domain::{
    major_of, CacheEntry, MigrationReport, OutdatedPackage, Package, ProjectRef, ScanResult,
    UpdateType, Vulnerability,
};
use crate::health::rules::framework_package;
use crate::ports::outbound::OutdatedEntry;
use chrono::Utc;

/// Points deducted per outdated package
const OUTDATED_PENALTY: u32 = 3;
/// Cap on the total outdated deduction
const OUTDATED_PENALTY_CAP: u32 = 40;
/// Points deducted per package that is a major version behind
const MAJOR_PENALTY: u32 = 10;

/// Everything one project scan produced, before merging
pub struct ScanParts {
    pub project: ProjectRef,
    pub packages: Vec<Package>,
    pub outdated: Vec<OutdatedEntry>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub migration: MigrationReport,
}

/// ReportMerger - combines the pipeline outputs of a project into one result
pub struct ReportMerger;

impl ReportMerger {
    pub fn merge(parts: ScanParts) -> ScanResult {
        let outdated = Self::classify_outdated(parts.outdated);
        let majors = outdated
            .iter()
            .filter(|o| o.update_type == UpdateType::Major)
            .count();
        let health_score = Self::health_score(outdated.len(), majors);

        let (current_version, latest_major) = match parts.project.framework.as_deref() {
            Some(framework) => {
                let governing = framework_package(framework);
                let current = parts
                    .packages
                    .iter()
                    .find(|p| p.name() == governing)
                    .map(|p| p.version().to_string())
                    .or_else(|| parts.migration.current_version.clone());
                let latest = outdated
                    .iter()
                    .find(|o| o.name == governing)
                    .map(|o| o.latest.as_str())
                    .or(current.as_deref())
                    .and_then(major_of);
                (current, latest)
            }
            None => (None, None),
        };

        ScanResult {
            project: parts.project,
            current_version,
            latest_major,
            package_count: parts.packages.len(),
            outdated,
            migration_needed: parts.migration.migration_needed,
            migration_guide: parts.migration.guide_url,
            issues: parts.migration.issues,
            vulnerabilities: parts.vulnerabilities,
            health_score,
            scanned_at: Utc::now(),
        }
    }

    /// Classifies outdated entries and orders them major, then minor, then patch.
    ///
    /// Entries whose versions do not actually differ are dropped. The sort is
    /// stable, so entries of the same kind keep the lister's order.
    pub fn classify_outdated(entries: Vec<OutdatedEntry>) -> Vec<OutdatedPackage> {
        let mut outdated: Vec<OutdatedPackage> = entries
            .into_iter()
            .filter_map(|e| {
                let update_type = UpdateType::classify(&e.current, &e.latest)?;
                Some(OutdatedPackage {
                    name: e.name,
                    current: e.current,
                    latest: e.latest,
                    update_type,
                })
            })
            .collect();
        outdated.sort_by_key(|o| o.update_type);
        outdated
    }

    /// 100 − min(3 × outdated, 40) − 10 × major, clamped to [0, 100]
    pub fn health_score(outdated: usize, major: usize) -> u8 {
        let outdated_penalty = u32::try_from(outdated)
            .unwrap_or(u32::MAX)
            .saturating_mul(OUTDATED_PENALTY)
            .min(OUTDATED_PENALTY_CAP);
        let major_penalty = u32::try_from(major)
            .unwrap_or(u32::MAX)
            .saturating_mul(MAJOR_PENALTY);
        let score = 100u32
            .saturating_sub(outdated_penalty)
            .saturating_sub(major_penalty);
        score.min(100) as u8
    }

    /// Cache rows for the projects that have at least one outdated package
    pub fn cache_entries(results: &[ScanResult]) -> Vec<CacheEntry> {
        results
            .iter()
            .filter(|r| r.outdated_count() > 0)
            .map(CacheEntry::from)
            .collect()
    }

    /// Projects worth showing in a live multi-project summary
    pub fn actionable_results(results: &[ScanResult]) -> Vec<&ScanResult> {
        results.iter().filter(|r| r.has_findings()).collect()
    }
}
