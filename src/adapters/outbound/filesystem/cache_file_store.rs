use crate::health::domain::CacheFile;
use crate::ports::outbound::CacheStore;
use crate::shared::error::HealthError;
use crate::shared::security::{check_readable_file, reject_symlink, MAX_FILE_SIZE};
use crate::shared::Result;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// JsonCacheStore adapter - the scan summary as a pretty-printed JSON file
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so readers see either the old or the new document. A
/// mutex serializes writers within the process.
pub struct JsonCacheStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonCacheStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, details: impl Into<String>) -> anyhow::Error {
        HealthError::CacheWriteError {
            path: self.path.clone(),
            details: details.into(),
        }
        .into()
    }
}

impl CacheStore for JsonCacheStore {
    fn write(&self, cache: &CacheFile) -> Result<()> {
        // A poisoned lock only means an earlier writer panicked; the file is intact
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        reject_symlink(&self.path, "cache write").map_err(|e| self.write_error(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(parent) if parent != Path::new("") => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|e| self.write_error(e.to_string()))?;

        let json = serde_json::to_string_pretty(cache)?;
        let mut temp = NamedTempFile::new_in(&dir).map_err(|e| self.write_error(e.to_string()))?;
        temp.write_all(json.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| self.write_error(e.to_string()))?;
        temp.persist(&self.path)
            .map_err(|e| self.write_error(e.error.to_string()))?;

        tracing::info!(
            path = %self.path.display(),
            projects = cache.projects.len(),
            run_id = %cache.run_id,
            "cache file replaced"
        );
        Ok(())
    }

    fn read(&self) -> Result<Option<CacheFile>> {
        if !self.path.exists() {
            return Ok(None);
        }
        check_readable_file(&self.path, MAX_FILE_SIZE)?;
        let content = fs::read_to_string(&self.path).map_err(|e| HealthError::FileReadError {
            path: self.path.clone(),
            details: e.to_string(),
        })?;
        let cache = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cache file {} is malformed: {}", self.path.display(), e))?;
        Ok(Some(cache))
    }
}
