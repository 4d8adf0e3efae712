//! Configuration file support for dep-health.
//!
//! Provides YAML-based configuration through `dep-health.config.yml` files,
//! including data structures, file loading, and validation.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::health::services::DEFAULT_DISCOVERY_DEPTH;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "dep-health.config.yml";

/// Cache file used when neither the config nor the CLI names one
pub const DEFAULT_CACHE_FILE: &str = ".dep-health-cache.json";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub scan_roots: Option<Vec<PathBuf>>,
    pub max_depth: Option<usize>,
    pub cache_file: Option<PathBuf>,
    pub exclude_projects: Option<Vec<String>>,
    pub ignore_advisories: Option<Vec<IgnoreAdvisory>>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// An advisory accepted as a known risk; dropped from scan results.
#[derive(Debug, Deserialize)]
pub struct IgnoreAdvisory {
    pub id: String,
    pub reason: Option<String>,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl ConfigFile {
    pub fn scan_roots(&self) -> Vec<PathBuf> {
        match &self.scan_roots {
            Some(roots) if !roots.is_empty() => roots.clone(),
            _ => vec![PathBuf::from(".")],
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_DISCOVERY_DEPTH)
    }

    pub fn cache_file(&self) -> PathBuf {
        self.cache_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CACHE_FILE))
    }

    /// Warn about unknown fields; call once logging is initialized.
    pub fn warn_unknown_fields(&self) {
        for key in self.unknown_fields.keys() {
            tracing::warn!(field = %key, "unknown config field will be ignored");
        }
    }

    pub fn ignored_advisory_ids(&self) -> Vec<String> {
        self.ignore_advisories
            .iter()
            .flatten()
            .map(|a| a.id.trim().to_string())
            .collect()
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref advisories) = config.ignore_advisories {
        for (i, entry) in advisories.iter().enumerate() {
            if entry.id.trim().is_empty() {
                bail!(
                    "Invalid config: ignore_advisories[{}].id must not be empty.\n\n\
                     💡 Hint: Each ignore_advisories entry must have a non-empty 'id' field (e.g., \"GHSA-8r8j-xvfj-36f9\").",
                    i
                );
            }
        }
    }
    if config.max_depth == Some(0) {
        bail!(
            "Invalid config: max_depth must be at least 1.\n\n\
             💡 Hint: Use 1 to only look at the scan roots' direct children."
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
scan_roots:
  - ~/work
  - /srv/apps
max_depth: 2
cache_file: /tmp/dep-health.json
exclude_projects:
  - legacy-*
ignore_advisories:
  - id: GHSA-8r8j-xvfj-36f9
    reason: "Dev-only dependency"
  - id: CVE-2024-5678
log_level: debug
log_format: json
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(
            config.scan_roots(),
            vec![PathBuf::from("~/work"), PathBuf::from("/srv/apps")]
        );
        assert_eq!(config.max_depth(), 2);
        assert_eq!(config.cache_file(), PathBuf::from("/tmp/dep-health.json"));
        assert_eq!(config.exclude_projects.as_deref(), Some(&["legacy-*".to_string()][..]));
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.log_format, Some(LogFormat::Json));

        let advisories = config.ignore_advisories.as_ref().unwrap();
        assert_eq!(advisories.len(), 2);
        assert_eq!(advisories[0].reason.as_deref(), Some("Dev-only dependency"));
        assert!(advisories[1].reason.is_none());
        assert_eq!(
            config.ignored_advisory_ids(),
            vec!["GHSA-8r8j-xvfj-36f9".to_string(), "CVE-2024-5678".to_string()]
        );
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "max_depth: 4\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.max_depth(), 4);
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        let config = discover_config(dir.path()).unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_unknown_log_format_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "log_format: xml\n").unwrap();

        assert!(load_config_from_path(&config_path).is_err());
    }

    #[test]
    fn test_empty_advisory_id_validation_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
ignore_advisories:
  - id: "   "
    reason: "whitespace only"
"#,
        )
        .unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("must not be empty"));
    }

    #[test]
    fn test_zero_depth_validation_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "max_depth: 0\n").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("max_depth"));
    }

    #[test]
    fn test_unknown_fields_collected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
max_depth: 3
format: json
another_unknown: value
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 2);
        assert!(config.unknown_fields.contains_key("format"));
        assert!(config.unknown_fields.contains_key("another_unknown"));
    }

    #[test]
    fn test_default_config() {
        let config = ConfigFile::default();
        assert_eq!(config.scan_roots(), vec![PathBuf::from(".")]);
        assert_eq!(config.max_depth(), DEFAULT_DISCOVERY_DEPTH);
        assert_eq!(config.cache_file(), PathBuf::from(DEFAULT_CACHE_FILE));
        assert!(config.ignored_advisory_ids().is_empty());
        assert!(config.unknown_fields.is_empty());
    }
}
