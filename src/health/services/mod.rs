pub mod doc_text;
pub mod inventory;
pub mod migration_scanner;
pub mod project_detector;
pub mod project_filter;
pub mod report_merger;
pub mod repository_url;

pub use inventory::PackageInventory;
pub use migration_scanner::{MigrationScanner, MAX_SCAN_DEPTH};
pub use project_detector::{detect_framework, ProjectDetector, DEFAULT_DISCOVERY_DEPTH};
pub use project_filter::ProjectFilter;
pub use report_merger::{ReportMerger, ScanParts};
pub use repository_url::parse_github_repository;
