use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// CI jobs can tell "the scan found something" apart from "the scan failed".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - nothing actionable found
    Success = 0,
    /// Vulnerabilities or breaking migration issues were found
    FindingsDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (network, file I/O, missing package, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::FindingsDetected => write!(f, "Findings Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors of the dependency-health pipeline.
///
/// Only fatal preconditions are errors; partial source failures are logged
/// and surface as missing data instead.
#[derive(Debug, Error)]
pub enum HealthError {
    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a project directory containing a supported manifest")]
    InvalidProjectPath { path: PathBuf, reason: String },

    #[error("Package not found in registry: {name}\nDetails: {details}\n\n💡 Hint: Check the package name spelling, including any @scope/ prefix")]
    PackageNotFound { name: String, details: String },

    #[error("A background scan is already running\n\n💡 Hint: Wait for the current scan to finish before starting another one")]
    ScanInProgress,

    #[error("Failed to write cache file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    CacheWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    /// Validation error for configuration and request values
    #[error("Validation error: {message}")]
    Validation { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::FindingsDetected.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(
            format!("{}", ExitCode::FindingsDetected),
            "Findings Detected (1)"
        );
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_package_not_found_display() {
        let error = HealthError::PackageNotFound {
            name: "@scope/missing".to_string(),
            details: "HTTP 404".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("Package not found"));
        assert!(display.contains("@scope/missing"));
        assert!(display.contains("HTTP 404"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_scan_in_progress_display() {
        let display = HealthError::ScanInProgress.to_string();
        assert!(display.contains("already running"));
    }

    #[test]
    fn test_invalid_project_path_display() {
        let error = HealthError::InvalidProjectPath {
            path: PathBuf::from("/invalid/path"),
            reason: "Directory does not exist".to_string(),
        };
        let display = error.to_string();
        assert!(display.contains("/invalid/path"));
        assert!(display.contains("Directory does not exist"));
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let error: anyhow::Error = HealthError::ScanInProgress.into();
        assert!(matches!(
            error.downcast_ref::<HealthError>(),
            Some(HealthError::ScanInProgress)
        ));
    }
}
