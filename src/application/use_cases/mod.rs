/// Use cases module containing application business logic orchestration
mod background_scan;
mod fetch_docs;
mod scan_project;

pub use background_scan::{BackgroundScanUseCase, ScanGuard, ScanPermit};
pub use fetch_docs::DocumentationAggregator;
pub use scan_project::ScanProjectUseCase;
