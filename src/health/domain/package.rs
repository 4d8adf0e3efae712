use crate::shared::Result;
use serde::{Deserialize, Serialize};

/// Maximum length for package names (security limit)
const MAX_PACKAGE_NAME_LENGTH: usize = 255;

/// Maximum length for package versions (security limit)
const MAX_VERSION_LENGTH: usize = 100;

/// Package ecosystem, named the way the OSV index names it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ecosystem {
    #[serde(rename = "npm")]
    Npm,
    #[serde(rename = "PyPI")]
    PyPi,
    #[serde(rename = "crates.io")]
    CratesIo,
    #[serde(rename = "Go")]
    Go,
    #[serde(rename = "Packagist")]
    Packagist,
}

impl Ecosystem {
    /// Identifier used in OSV batch queries
    pub fn osv_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::PyPi => "PyPI",
            Ecosystem::CratesIo => "crates.io",
            Ecosystem::Go => "Go",
            Ecosystem::Packagist => "Packagist",
        }
    }
}

impl std::fmt::Display for Ecosystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.osv_name())
    }
}

/// Project language; each language is served by exactly one ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Node,
    Python,
    Rust,
    Go,
    Php,
}

impl Language {
    pub fn ecosystem(&self) -> Ecosystem {
        match self {
            Language::Node => Ecosystem::Npm,
            Language::Python => Ecosystem::PyPi,
            Language::Rust => Ecosystem::CratesIo,
            Language::Go => Ecosystem::Go,
            Language::Php => Ecosystem::Packagist,
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "node" | "javascript" | "typescript" | "js" | "ts" => Ok(Language::Node),
            "python" | "py" => Ok(Language::Python),
            "rust" | "rs" => Ok(Language::Rust),
            "go" | "golang" => Ok(Language::Go),
            "php" => Ok(Language::Php),
            _ => Err(format!(
                "Invalid language: {}. Please specify one of: node, python, rust, go, php",
                s
            )),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Language::Node => "node",
            Language::Python => "python",
            Language::Rust => "rust",
            Language::Go => "go",
            Language::Php => "php",
        };
        write!(f, "{}", name)
    }
}

/// NewType wrapper for package name with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    pub fn new(name: String) -> Result<Self> {
        if name.is_empty() {
            anyhow::bail!("Package name cannot be empty");
        }

        if name.len() > MAX_PACKAGE_NAME_LENGTH {
            anyhow::bail!(
                "Package name is too long ({} bytes). Maximum allowed: {} bytes",
                name.len(),
                MAX_PACKAGE_NAME_LENGTH
            );
        }

        // Scoped npm names (@scope/name), Go module paths and composer vendor/name
        // need '@' and '/'; everything else is rejected.
        if !name.chars().all(|c| {
            c.is_alphanumeric()
                || c == '-'
                || c == '_'
                || c == '.'
                || c == '@'
                || c == '/'
                || c == '['
                || c == ']'
        }) {
            anyhow::bail!(
                "Package name contains invalid characters: {}",
                name
            );
        }

        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PackageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// NewType wrapper for a resolved package version with validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Version(String);

impl Version {
    pub fn new(version: String) -> Result<Self> {
        if version.is_empty() {
            anyhow::bail!("Package version cannot be empty");
        }

        if version.len() > MAX_VERSION_LENGTH {
            anyhow::bail!(
                "Package version is too long ({} bytes). Maximum allowed: {} bytes",
                version.len(),
                MAX_VERSION_LENGTH
            );
        }

        if !version
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == '+' || c == '*' || c == '_')
        {
            anyhow::bail!(
                "Package version contains invalid characters: {}",
                version
            );
        }

        Ok(Self(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Package value object: one installed dependency of a project.
///
/// Identity is (name, ecosystem); the version is the installed/resolved one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Package {
    name: PackageName,
    version: Version,
    ecosystem: Ecosystem,
}

impl Package {
    pub fn new(name: String, version: String, ecosystem: Ecosystem) -> Result<Self> {
        Ok(Self {
            name: PackageName::new(name)?,
            version: Version::new(version)?,
            ecosystem,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn version(&self) -> &str {
        self.version.as_str()
    }

    pub fn ecosystem(&self) -> Ecosystem {
        self.ecosystem
    }
}
