/// Filesystem adapters for file I/O operations
mod cache_file_store;
mod file_reader;
mod file_writer;

pub use cache_file_store::JsonCacheStore;
pub use file_reader::FileSystemReader;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
