/// Network adapters for external API calls
mod caching_doc_repository;
mod npm_registry_client;
mod osv_client;

pub use caching_doc_repository::CachingDocRepository;
pub use npm_registry_client::NpmDocRepository;
pub use osv_client::{
    HttpOsvTransport, OsvBatchQuery, OsvBatchResponse, OsvClient, OsvResult, OsvTransport,
    OsvVulnerability, MAX_BATCH_SIZE,
};
