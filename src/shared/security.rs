use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Maximum size of any manifest, lockfile or cache file read (100 MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Rejects symbolic links at `path`.
///
/// Uses `symlink_metadata()` so the link itself is inspected, not its target.
/// A path that does not exist yet passes.
pub fn reject_symlink(path: &Path, operation: &str) -> Result<()> {
    match fs::symlink_metadata(path) {
        Ok(metadata) if metadata.is_symlink() => anyhow::bail!(
            "Security: {} is a symbolic link; {} through symbolic links is not allowed.",
            path.display(),
            operation
        ),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(anyhow::anyhow!(
            "Failed to inspect {} before {}: {}",
            path.display(),
            operation,
            e
        )),
    }
}

/// Checks that `path` is a regular, non-symlink file no larger than `max_size`
/// and returns its size.
pub fn check_readable_file(path: &Path, max_size: u64) -> Result<u64> {
    let metadata = fs::symlink_metadata(path)
        .map_err(|e| anyhow::anyhow!("Cannot access {}: {}", path.display(), e))?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. Symbolic links are not followed.",
            path.display()
        );
    }
    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }
    if metadata.len() > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            metadata.len(),
            max_size
        );
    }

    Ok(metadata.len())
}

/// Rejects relative paths that climb out of the directory they are joined to
pub fn check_contained_relative_path(relative: &str) -> Result<()> {
    let path = Path::new(relative);
    let escapes = path.is_absolute()
        || path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));
    if escapes {
        anyhow::bail!("Security: path '{}' escapes the project directory", relative);
    }
    Ok(())
}
