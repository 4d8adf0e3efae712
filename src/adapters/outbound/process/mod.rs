/// Subprocess adapters for native package managers
mod native_package_lister;
pub mod outdated_parsers;

pub use native_package_lister::NativePackageLister;
