use crate::health::domain::Language;
use std::path::PathBuf;

/// ScanRequest - Internal request DTO for the single-project scan use case
///
/// `language` and `framework` override what detection finds in the
/// project directory.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Path to the project directory
    pub project_path: PathBuf,
    /// Language to scan as, instead of the detected one
    pub language: Option<Language>,
    /// Governing framework, instead of the detected one
    pub framework: Option<String>,
}

impl ScanRequest {
    pub fn new(project_path: PathBuf) -> Self {
        Self {
            project_path,
            language: None,
            framework: None,
        }
    }

    pub fn with_language(mut self, language: Option<Language>) -> Self {
        self.language = language;
        self
    }

    pub fn with_framework(mut self, framework: Option<String>) -> Self {
        self.framework = framework;
        self
    }
}

/// ScanAllRequest - which roots the background scan walks
#[derive(Debug, Clone)]
pub struct ScanAllRequest {
    pub roots: Vec<PathBuf>,
    pub max_depth: usize,
    pub exclude_projects: Vec<String>,
}
