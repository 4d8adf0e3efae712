//! Dependency-health domain: models, the migration rule registry and the
//! pure services of the enrichment pipeline.

pub mod domain;
pub mod rules;
pub mod services;
