/// Result alias with `anyhow::Error`, used across every layer.
/// Typed failures are `HealthError` values wrapped in the anyhow error.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
