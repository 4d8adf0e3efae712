//! One-line human summaries printed to stderr next to the JSON report.

use crate::health::domain::{DocsReport, IssueSeverity, ScanResult, Severity};
use owo_colors::OwoColorize;
use std::io::IsTerminal;

/// Renders summaries, colored only when stderr is a terminal and
/// `NO_COLOR` is unset
pub struct SummaryPrinter {
    color: bool,
}

impl SummaryPrinter {
    pub fn new() -> Self {
        let color = std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal();
        Self { color }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    fn score(&self, score: u8) -> String {
        let text = format!("score {}", score);
        if !self.color {
            return text;
        }
        match score {
            80..=100 => text.green().to_string(),
            50..=79 => text.yellow().to_string(),
            _ => text.red().bold().to_string(),
        }
    }

    fn emphasize(&self, text: String, alarming: bool) -> String {
        match (self.color, alarming) {
            (true, true) => text.red().to_string(),
            (true, false) => text.dimmed().to_string(),
            (false, _) => text,
        }
    }

    /// `web (node, svelte 4.2.19) score 87 | 3 outdated (1 major) | ...`
    pub fn scan_line(&self, result: &ScanResult) -> String {
        let project = &result.project;
        let framework = match (&project.framework, &result.current_version) {
            (Some(f), Some(v)) => format!(", {} {}", f, v),
            (Some(f), None) => format!(", {}", f),
            _ => String::new(),
        };
        let name = if self.color {
            project.name.bold().to_string()
        } else {
            project.name.clone()
        };

        let outdated = format!(
            "{} outdated ({} major)",
            result.outdated_count(),
            result.major_count()
        );
        let severe = result
            .vulnerabilities
            .iter()
            .filter(|v| matches!(v.severity, Severity::Critical | Severity::High))
            .count();
        let vulns = format!(
            "{} vulnerabilities ({} high+)",
            result.vulnerabilities.len(),
            severe
        );
        let breaking = result
            .issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Breaking)
            .count();
        let issues = format!("{} migration issues ({} breaking)", result.issues.len(), breaking);

        format!(
            "{} ({}{}) {} | {} | {} | {}",
            name,
            project.language,
            framework,
            self.score(result.health_score),
            self.emphasize(outdated, result.major_count() > 0),
            self.emphasize(vulns, severe > 0),
            self.emphasize(issues, breaking > 0),
        )
    }

    /// Totals line for a multi-project scan
    pub fn batch_line(&self, scanned: usize, actionable: usize, cached: usize) -> String {
        format!(
            "Scanned {} projects: {} with issues or vulnerabilities, {} written to cache",
            scanned, actionable, cached
        )
    }

    /// `svelte 5.1.0: readme, changelog`
    pub fn docs_line(&self, report: &DocsReport) -> String {
        let found: Vec<&str> = [
            ("readme", report.readme.is_some()),
            ("changelog", report.changelog.is_some()),
            ("migration guide", report.migration_guide.is_some()),
        ]
        .iter()
        .filter(|(_, present)| *present)
        .map(|(label, _)| *label)
        .collect();

        let found = if found.is_empty() {
            "no documentation found".to_string()
        } else {
            found.join(", ")
        };
        match &report.latest_version {
            Some(version) => format!("{} {}: {}", report.name, version, found),
            None => format!("{}: {}", report.name, found),
        }
    }
}

impl Default for SummaryPrinter {
    fn default() -> Self {
        Self::new()
    }
}
