/// Ports module defining interfaces for hexagonal architecture
///
/// Outbound ports (driven ports) describe every external capability the
/// health pipeline consumes, so use cases can be exercised with fakes.
pub mod outbound;
