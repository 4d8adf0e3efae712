use clap::{Parser, Subcommand};
use dep_health::health::domain::{DocSection, Language};
use std::path::PathBuf;

/// Monitor dependency health: outdated packages, known vulnerabilities and
/// migration risk ahead of framework upgrades
#[derive(Parser, Debug)]
#[command(name = "dep-health")]
#[command(version)]
#[command(about = "Monitor dependency health of local projects", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    /// Only print errors to stderr
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Log level filter (overridden by RUST_LOG), e.g. "info" or "dep_health=debug"
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan one project and print its health report
    Scan {
        /// Path to the project directory (defaults to current directory)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Governing framework, overriding detection (e.g. svelte, react)
        #[arg(long)]
        framework: Option<String>,

        /// Project language, overriding detection: node, python, rust, go or php
        #[arg(long)]
        language: Option<Language>,
    },

    /// Scan every project under the configured roots and refresh the cache
    ScanAll {
        /// Configuration file (defaults to ./dep-health.config.yml when present)
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Cache file to replace, overriding the configured one
        #[arg(long, value_name = "FILE")]
        cache: Option<PathBuf>,

        /// Directory to search for projects; may be repeated
        #[arg(short, long = "root", value_name = "DIR")]
        roots: Vec<PathBuf>,
    },

    /// Fetch README, changelog and migration guide of an npm package
    Docs {
        /// Package name, e.g. svelte or @sveltejs/kit
        package: String,

        /// Keep only lines near these keywords
        #[arg(long)]
        query: Option<String>,

        /// Section to fetch: all, readme, changelog or migration
        #[arg(long, default_value = "all")]
        section: DocSection,
    },
}

impl Args {
    pub fn try_parse_args() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scan_with_overrides() {
        let args = Args::try_parse_from([
            "dep-health",
            "scan",
            "-p",
            "./web",
            "--framework",
            "svelte",
            "--language",
            "ts",
        ])
        .unwrap();
        match args.command {
            Command::Scan {
                path,
                framework,
                language,
            } => {
                assert_eq!(path, Some(PathBuf::from("./web")));
                assert_eq!(framework.as_deref(), Some("svelte"));
                assert_eq!(language, Some(Language::Node));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_scan_all_with_global_output() {
        let args = Args::try_parse_from([
            "dep-health",
            "scan-all",
            "--cache",
            "/tmp/cache.json",
            "-r",
            "/a",
            "-r",
            "/b",
            "--output",
            "out.json",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out.json")));
        match args.command {
            Command::ScanAll { config, cache, roots } => {
                assert!(config.is_none());
                assert_eq!(cache, Some(PathBuf::from("/tmp/cache.json")));
                assert_eq!(roots, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_docs_defaults_to_all_sections() {
        let args = Args::try_parse_from(["dep-health", "docs", "@sveltejs/kit"]).unwrap();
        match args.command {
            Command::Docs {
                package,
                query,
                section,
            } => {
                assert_eq!(package, "@sveltejs/kit");
                assert!(query.is_none());
                assert_eq!(section, DocSection::All);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_language_rejected() {
        let err = Args::try_parse_from(["dep-health", "scan", "--language", "cobol"]).unwrap_err();
        assert!(err.to_string().contains("Invalid language"));
    }

    #[test]
    fn test_invalid_section_rejected() {
        assert!(Args::try_parse_from(["dep-health", "docs", "svelte", "--section", "faq"]).is_err());
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Args::try_parse_from(["dep-health"]).is_err());
    }
}
