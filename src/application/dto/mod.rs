/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod docs_request;
mod scan_all_response;
mod scan_request;

pub use docs_request::DocsRequest;
pub use scan_all_response::ScanAllResponse;
pub use scan_request::{ScanAllRequest, ScanRequest};
