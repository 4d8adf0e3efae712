/// Mock implementations for testing
mod mock_doc_repository;
mod mock_package_lister;
mod mock_progress_reporter;
mod mock_vulnerability_index;

#[allow(unused_imports)]
pub use mock_doc_repository::MockDocRepository;
#[allow(unused_imports)]
pub use mock_package_lister::MockPackageLister;
#[allow(unused_imports)]
pub use mock_progress_reporter::MockProgressReporter;
#[allow(unused_imports)]
pub use mock_vulnerability_index::MockVulnerabilityIndex;
