/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports: file system, HTTP
/// clients, package-manager subprocesses and the console.
pub mod outbound;
