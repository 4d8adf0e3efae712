//! Logging initialization for dep-health.
//!
//! Configures `tracing-subscriber` from the `log_level` / `log_format`
//! config fields. Logs always go to stderr; stdout carries the JSON report.

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Level used when neither `RUST_LOG` nor the config sets one
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `log_level`. Must be called at most
/// once per process.
///
/// # Formats
///
/// * `Json` - Machine-parseable JSON lines
/// * `Pretty` - Compact human-readable lines
pub fn init_tracing(log_level: Option<&str>, format: LogFormat) -> Result<()> {
    let level = log_level.unwrap_or(DEFAULT_LOG_LEVEL);
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| anyhow::anyhow!("invalid log level '{}': {}", level, e))?,
    };

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize JSON tracing subscriber: {}", e))?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to initialize tracing subscriber: {}", e))?,
    }

    Ok(())
}
