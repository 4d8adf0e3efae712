/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, network, subprocesses, console).
pub mod cache_store;
pub mod doc_repository;
pub mod manifest_reader;
pub mod output_presenter;
pub mod package_lister;
pub mod progress_reporter;
pub mod vulnerability_index;

pub use cache_store::CacheStore;
pub use doc_repository::{DocRepository, RegistryMetadata};
pub use manifest_reader::ManifestReader;
pub use output_presenter::OutputPresenter;
pub use package_lister::{OutdatedEntry, PackageLister};
pub use progress_reporter::ProgressReporter;
pub use vulnerability_index::VulnerabilityIndex;
