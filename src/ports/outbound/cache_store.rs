use crate::health::domain::CacheFile;
use crate::shared::Result;

/// CacheStore port for the shared scan summary file
///
/// Implementations are single-writer: a write fully replaces the previous
/// content, never merges into it.
pub trait CacheStore: Send + Sync {
    /// Replaces the cache with the given document
    fn write(&self, cache: &CacheFile) -> Result<()>;

    /// Reads the current cache, `None` when nothing was written yet
    fn read(&self) -> Result<Option<CacheFile>>;
}
