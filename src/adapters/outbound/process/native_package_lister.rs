use super::outdated_parsers;
use crate::health::domain::Language;
use crate::ports::outbound::{OutdatedEntry, PackageLister};
use crate::shared::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

const TIMEOUT_SECONDS: u64 = 30;

/// Program and arguments that print a project's outdated packages as JSON
struct ListerCommand {
    program: PathBuf,
    args: &'static [&'static str],
    parse: fn(&str) -> Result<Vec<OutdatedEntry>>,
}

/// NativePackageLister adapter - asks the ecosystem's own package manager
///
/// Implements the PackageLister port by running the tool in the project
/// directory. Package managers exit non-zero when something is outdated, so
/// the exit status is ignored and stdout is parsed regardless. A tool that
/// cannot be started or does not finish within 30 seconds is an error.
pub struct NativePackageLister {
    timeout: Duration,
}

impl NativePackageLister {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(TIMEOUT_SECONDS),
        }
    }

    fn command_for(project_path: &Path, language: Language) -> ListerCommand {
        match language {
            Language::Node => ListerCommand {
                program: PathBuf::from("npm"),
                args: &["outdated", "--json"],
                parse: outdated_parsers::parse_npm,
            },
            Language::Python => {
                // Prefer the project's own virtualenv so its packages are listed
                let venv_pip = project_path.join(".venv").join("bin").join("pip");
                ListerCommand {
                    program: if venv_pip.is_file() {
                        venv_pip
                    } else {
                        PathBuf::from("pip")
                    },
                    args: &["list", "--outdated", "--format=json"],
                    parse: outdated_parsers::parse_pip,
                }
            }
            Language::Rust => ListerCommand {
                program: PathBuf::from("cargo"),
                args: &["outdated", "--format", "json"],
                parse: outdated_parsers::parse_cargo,
            },
            Language::Go => ListerCommand {
                program: PathBuf::from("go"),
                args: &["list", "-u", "-m", "-json", "all"],
                parse: outdated_parsers::parse_go,
            },
            Language::Php => ListerCommand {
                program: PathBuf::from("composer"),
                args: &["outdated", "--format=json"],
                parse: outdated_parsers::parse_composer,
            },
        }
    }
}

impl Default for NativePackageLister {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PackageLister for NativePackageLister {
    async fn list_outdated(&self, project_path: &Path, language: Language) -> Result<Vec<OutdatedEntry>> {
        let command = Self::command_for(project_path, language);
        let program = command.program.display().to_string();

        let child = Command::new(&command.program)
            .args(command.args)
            .current_dir(project_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, child)
            .await
            .map_err(|_| anyhow::anyhow!("{} timed out after {:?}", program, self.timeout))?
            .map_err(|e| anyhow::anyhow!("Failed to run {}: {}", program, e))?;

        if !output.status.success() {
            tracing::debug!(
                program = %program,
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "package manager exited non-zero; parsing stdout anyway"
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        (command.parse)(&stdout)
            .map_err(|e| anyhow::anyhow!("Unexpected {} output: {}", program, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_command_for_each_language() {
        let dir = TempDir::new().unwrap();
        let cases = [
            (Language::Node, "npm", "outdated"),
            (Language::Python, "pip", "list"),
            (Language::Rust, "cargo", "outdated"),
            (Language::Go, "go", "list"),
            (Language::Php, "composer", "outdated"),
        ];
        for (language, program, first_arg) in cases {
            let command = NativePackageLister::command_for(dir.path(), language);
            assert_eq!(command.program, PathBuf::from(program));
            assert_eq!(command.args[0], first_arg);
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_prefers_project_virtualenv() {
        let dir = TempDir::new().unwrap();
        let bin = dir.path().join(".venv/bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("pip"), "").unwrap();

        let command = NativePackageLister::command_for(dir.path(), Language::Python);
        assert_eq!(command.program, bin.join("pip"));
    }

    #[tokio::test]
    async fn test_project_without_manifest_yields_nothing() {
        let dir = TempDir::new().unwrap();
        let lister = NativePackageLister::new();
        // Either the tool is absent (error) or it has nothing to report
        if let Ok(entries) = lister.list_outdated(dir.path(), Language::Php).await {
            assert!(entries.is_empty());
        }
    }
}
