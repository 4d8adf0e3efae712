use serde::Serialize;

/// Which documentation sections a lookup should fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocSection {
    #[default]
    All,
    Readme,
    Changelog,
    Migration,
}

impl DocSection {
    pub fn includes_readme(&self) -> bool {
        matches!(self, DocSection::All | DocSection::Readme)
    }

    pub fn includes_changelog(&self) -> bool {
        matches!(self, DocSection::All | DocSection::Changelog)
    }

    pub fn includes_migration(&self) -> bool {
        matches!(self, DocSection::All | DocSection::Migration)
    }
}

impl std::str::FromStr for DocSection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" => Ok(DocSection::All),
            "readme" => Ok(DocSection::Readme),
            "changelog" | "changes" => Ok(DocSection::Changelog),
            "migration" | "upgrade" => Ok(DocSection::Migration),
            _ => Err(format!(
                "Invalid section: {}. Please specify 'all', 'readme', 'changelog' or 'migration'",
                s
            )),
        }
    }
}

/// Canonical source repository of a package (GitHub owner/name)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn web_url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

/// Aggregated documentation for one package
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocsReport {
    pub name: String,
    pub latest_version: Option<String>,
    pub description: Option<String>,
    pub homepage: Option<String>,
    pub repository: Option<String>,
    pub readme: Option<String>,
    pub changelog: Option<String>,
    pub migration_guide: Option<String>,
}
