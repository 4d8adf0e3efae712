pub mod documentation;
pub mod migration;
pub mod package;
pub mod scan_result;
pub mod version;
pub mod vulnerability;

pub use documentation::{DocSection, DocsReport, RepositoryRef};
pub use migration::{IssueSeverity, MigrationIssue, MigrationPattern, MigrationReport, MigrationRule};
pub use package::{Ecosystem, Language, Package, PackageName, Version};
pub use scan_result::{CacheEntry, CacheFile, OutdatedPackage, ProjectRef, ScanResult};
pub use version::{major_of, strip_range_operator, UpdateType};
pub use vulnerability::{Severity, Vulnerability};
