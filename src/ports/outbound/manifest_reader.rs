use crate::shared::Result;
use std::path::Path;

/// ManifestReader port for reading manifest and lockfile contents
///
/// This port abstracts the file system operations needed to read
/// dependency declarations (package.json, Cargo.lock, requirements.txt, ...)
/// from a project directory.
pub trait ManifestReader: Send + Sync {
    /// Reads a file relative to the project directory
    ///
    /// # Arguments
    /// * `project_path` - Path to the project directory
    /// * `relative_path` - File path relative to the project (e.g. `node_modules/svelte/package.json`)
    ///
    /// # Returns
    /// The raw content of the file as a string
    ///
    /// # Errors
    /// Returns an error if:
    /// - The file does not exist
    /// - The file cannot be read due to permissions or I/O errors
    fn read_manifest(&self, project_path: &Path, relative_path: &str) -> Result<String>;
}
