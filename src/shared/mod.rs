pub mod error;
pub mod result;
pub mod security;

pub use error::{ExitCode, HealthError};
pub use result::Result;
