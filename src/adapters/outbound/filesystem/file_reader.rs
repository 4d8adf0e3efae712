use crate::ports::outbound::ManifestReader;
use crate::shared::error::HealthError;
use crate::shared::security::{check_contained_relative_path, check_readable_file, MAX_FILE_SIZE};
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// FileSystemReader adapter for reading manifests and lockfiles
///
/// Every read rejects symbolic links, non-regular files, files above the
/// size limit and relative paths that leave the project directory.
pub struct FileSystemReader;

impl FileSystemReader {
    pub fn new() -> Self {
        Self
    }

    /// Reads a file after the security checks
    fn safe_read_file(&self, path: &Path) -> Result<String> {
        check_readable_file(path, MAX_FILE_SIZE)?;
        fs::read_to_string(path).map_err(|e| {
            HealthError::FileReadError {
                path: path.to_path_buf(),
                details: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestReader for FileSystemReader {
    fn read_manifest(&self, project_path: &Path, relative_path: &str) -> Result<String> {
        check_contained_relative_path(relative_path)?;
        self.safe_read_file(&project_path.join(relative_path))
    }
}
