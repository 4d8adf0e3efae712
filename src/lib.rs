//! dep-health - dependency health monitor for local projects
//!
//! This library inventories the installed packages of a project, queries OSV
//! for known vulnerabilities, lists outdated packages through the native
//! package manager and scans source files for framework migration risk,
//! then merges everything into one report with a health score. It follows
//! hexagonal architecture.
//!
//! # Architecture
//!
//! - **Health core** (`health`): domain models, migration rules and pure services
//! - **Application Layer** (`application`): use cases and DTOs
//! - **Ports** (`ports`): interface definitions for infrastructure
//! - **Adapters** (`adapters`): concrete implementations of ports
//! - **Shared** (`shared`): error types and security checks
//!
//! # Example
//!
//! ```no_run
//! use dep_health::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn scan() -> Result<()> {
//! let use_case = ScanProjectUseCase::new(
//!     FileSystemReader::new(),
//!     OsvClient::new()?,
//!     NativePackageLister::new(),
//!     StderrProgressReporter::new(),
//! );
//!
//! let result = use_case.execute(ScanRequest::new(PathBuf::from("."))).await?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod health;
pub mod logging;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{StderrProgressReporter, SummaryPrinter};
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, JsonCacheStore, StdoutPresenter,
    };
    pub use crate::adapters::outbound::network::{CachingDocRepository, NpmDocRepository, OsvClient};
    pub use crate::adapters::outbound::process::NativePackageLister;
    pub use crate::application::dto::{DocsRequest, ScanAllRequest, ScanAllResponse, ScanRequest};
    pub use crate::application::use_cases::{
        BackgroundScanUseCase, DocumentationAggregator, ScanGuard, ScanProjectUseCase,
    };
    pub use crate::health::domain::{
        CacheEntry, CacheFile, DocSection, DocsReport, Ecosystem, IssueSeverity, Language,
        MigrationIssue, MigrationReport, OutdatedPackage, Package, ProjectRef, RepositoryRef,
        ScanResult, Severity, UpdateType, Vulnerability,
    };
    pub use crate::health::services::{MigrationScanner, PackageInventory, ReportMerger, ScanParts};
    pub use crate::ports::outbound::{
        CacheStore, DocRepository, ManifestReader, OutdatedEntry, OutputPresenter, PackageLister,
        ProgressReporter, RegistryMetadata, VulnerabilityIndex,
    };
    pub use crate::shared::{ExitCode, HealthError, Result};
}
