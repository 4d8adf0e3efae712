mod cli;

use cli::{Args, Command};
use dep_health::adapters::outbound::console::{StderrProgressReporter, SummaryPrinter};
use dep_health::adapters::outbound::filesystem::{
    FileSystemReader, FileSystemWriter, JsonCacheStore, StdoutPresenter,
};
use dep_health::adapters::outbound::network::{CachingDocRepository, NpmDocRepository, OsvClient};
use dep_health::adapters::outbound::process::NativePackageLister;
use dep_health::application::dto::{DocsRequest, ScanAllRequest, ScanRequest};
use dep_health::application::use_cases::{
    BackgroundScanUseCase, DocumentationAggregator, ScanGuard, ScanProjectUseCase,
};
use dep_health::config::{self, ConfigFile};
use dep_health::health::domain::{IssueSeverity, ScanResult};
use dep_health::logging;
use dep_health::ports::outbound::OutputPresenter;
use dep_health::shared::{ExitCode, HealthError, Result};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

#[tokio::main]
async fn main() {
    let args = match Args::try_parse_args() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version are reported as "errors" by clap
            let code = if e.use_stderr() {
                ExitCode::InvalidArguments
            } else {
                ExitCode::Success
            };
            let _ = e.print();
            process::exit(code.as_i32());
        }
    };

    match run(args).await {
        Ok(code) => process::exit(code.as_i32()),
        Err(e) => {
            eprintln!("\n❌ An error occurred:\n");
            eprintln!("{}", e);

            // Display error chain
            let mut source = e.source();
            while let Some(err) = source {
                eprintln!("\nCaused by: {}", err);
                source = err.source();
            }

            eprintln!();
            process::exit(ExitCode::ApplicationError.as_i32());
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let explicit_config = match &args.command {
        Command::ScanAll { config, .. } => config.clone(),
        _ => None,
    };
    let config = match explicit_config {
        Some(path) => config::load_config_from_path(&path)?,
        None => config::discover_config(Path::new("."))?.unwrap_or_default(),
    };

    logging::init_tracing(
        args.log_level.as_deref().or(config.log_level.as_deref()),
        config.log_format.unwrap_or_default(),
    )?;
    config.warn_unknown_fields();

    let summary = SummaryPrinter::new();
    let presenter: Box<dyn OutputPresenter> = match &args.output {
        Some(path) => Box::new(FileSystemWriter::new(path.clone())),
        None => Box::new(StdoutPresenter::new()),
    };
    let reporter = if args.quiet {
        StderrProgressReporter::quiet()
    } else {
        StderrProgressReporter::new()
    };

    match args.command {
        Command::Scan {
            path,
            framework,
            language,
        } => {
            let project_path = path.unwrap_or_else(|| PathBuf::from("."));
            validate_project_path(&project_path)?;

            let use_case = scan_use_case(&config, reporter)?;
            let request = ScanRequest::new(project_path)
                .with_language(language)
                .with_framework(framework);
            let result = use_case.execute(request).await?;

            presenter.present(&serde_json::to_string_pretty(&result)?)?;
            if !args.quiet {
                eprintln!("{}", summary.scan_line(&result));
            }
            Ok(exit_code_for(std::slice::from_ref(&result)))
        }
        Command::ScanAll { cache, roots, .. } => {
            let roots = if roots.is_empty() { config.scan_roots() } else { roots };
            let cache_path = cache.unwrap_or_else(|| config.cache_file());

            let use_case = BackgroundScanUseCase::new(
                scan_use_case(&config, reporter)?,
                JsonCacheStore::new(cache_path),
                Arc::new(ScanGuard::new()),
            );
            let request = ScanAllRequest {
                roots,
                max_depth: config.max_depth(),
                exclude_projects: config.exclude_projects.clone().unwrap_or_default(),
            };
            let response = use_case.execute(request).await?;

            presenter.present(&serde_json::to_string_pretty(&response)?)?;
            if !args.quiet {
                for result in &response.projects {
                    eprintln!("{}", summary.scan_line(result));
                }
                eprintln!(
                    "{}",
                    summary.batch_line(response.scanned, response.projects.len(), response.cached_projects)
                );
            }
            Ok(exit_code_for(&response.projects))
        }
        Command::Docs {
            package,
            query,
            section,
        } => {
            let repository = CachingDocRepository::new(NpmDocRepository::new()?);
            let aggregator = DocumentationAggregator::new(repository);
            let request = DocsRequest::new(package)
                .with_query(query)
                .with_section(section);
            let report = aggregator.execute(request).await?;

            presenter.present(&serde_json::to_string_pretty(&report)?)?;
            if !args.quiet {
                eprintln!("{}", summary.docs_line(&report));
            }
            Ok(ExitCode::Success)
        }
    }
}

type CliScanUseCase =
    ScanProjectUseCase<FileSystemReader, OsvClient, NativePackageLister, StderrProgressReporter>;

fn scan_use_case(config: &ConfigFile, reporter: StderrProgressReporter) -> Result<CliScanUseCase> {
    Ok(ScanProjectUseCase::new(
        FileSystemReader::new(),
        OsvClient::new()?,
        NativePackageLister::new(),
        reporter,
    )
    .with_ignored_advisories(config.ignored_advisory_ids()))
}

/// Vulnerabilities or breaking migration issues fail the run
fn exit_code_for(results: &[ScanResult]) -> ExitCode {
    let findings = results.iter().any(|r| {
        !r.vulnerabilities.is_empty() || r.issues.iter().any(|i| i.severity == IssueSeverity::Breaking)
    });
    if findings {
        ExitCode::FindingsDetected
    } else {
        ExitCode::Success
    }
}

fn validate_project_path(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(HealthError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Directory does not exist".to_string(),
        }
        .into());
    }

    // Security check: Reject symbolic links for project paths
    let metadata = std::fs::symlink_metadata(path).map_err(|e| HealthError::InvalidProjectPath {
        path: path.to_path_buf(),
        reason: format!("Failed to read path metadata: {}", e),
    })?;

    if metadata.is_symlink() {
        return Err(HealthError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Security: Project path is a symbolic link. For security reasons, symbolic links are not allowed.".to_string(),
        }
        .into());
    }

    if !path.is_dir() {
        return Err(HealthError::InvalidProjectPath {
            path: path.to_path_buf(),
            reason: "Not a directory".to_string(),
        }
        .into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dep_health::health::domain::{Language, MigrationIssue, ProjectRef};
    use std::fs;
    use tempfile::TempDir;

    fn result_with_issue(severity: IssueSeverity) -> ScanResult {
        ScanResult {
            project: ProjectRef::new("web".to_string(), PathBuf::from("/p/web"), Language::Node, None),
            current_version: None,
            latest_major: None,
            package_count: 0,
            outdated: Vec::new(),
            migration_needed: true,
            migration_guide: None,
            issues: vec![MigrationIssue {
                severity,
                pattern_source: "x".to_string(),
                file: "a.js".to_string(),
                line: 1,
                message: String::new(),
                migration_hint: String::new(),
            }],
            vulnerabilities: Vec::new(),
            health_score: 100,
            scanned_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_exit_code_for_findings() {
        assert_eq!(exit_code_for(&[]), ExitCode::Success);
        assert_eq!(
            exit_code_for(&[result_with_issue(IssueSeverity::Deprecated)]),
            ExitCode::Success
        );
        assert_eq!(
            exit_code_for(&[result_with_issue(IssueSeverity::Breaking)]),
            ExitCode::FindingsDetected
        );
    }

    #[test]
    fn test_validate_project_path_valid_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_project_path(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_validate_project_path_nonexistent() {
        let err = validate_project_path(Path::new("/nonexistent/path/that/does/not/exist")).unwrap_err();
        assert!(format!("{}", err).contains("Directory does not exist"));
    }

    #[test]
    fn test_validate_project_path_file_not_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("package.json");
        fs::write(&file_path, "{}").unwrap();

        let err = validate_project_path(&file_path).unwrap_err();
        assert!(format!("{}", err).contains("Not a directory"));
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_project_path_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real");
        fs::create_dir(&target).unwrap();
        let link = temp_dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = validate_project_path(&link).unwrap_err();
        assert!(format!("{}", err).contains("symbolic link"));
    }
}
