use serde::{Deserialize, Serialize};

/// Advisory severity bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Moderate,
    Low,
}

impl Severity {
    /// Maps a numeric score onto a bucket.
    ///
    /// - `>= 9.0` -> Critical
    /// - `>= 7.0` -> High
    /// - `>= 4.0` -> Moderate
    /// - otherwise Low
    ///
    /// Advisories without any score are Moderate.
    pub fn from_score(score: Option<f64>) -> Self {
        match score {
            Some(s) if s >= 9.0 => Severity::Critical,
            Some(s) if s >= 7.0 => Severity::High,
            Some(s) if s >= 4.0 => Severity::Moderate,
            Some(_) => Severity::Low,
            None => Severity::Moderate,
        }
    }

    /// Parses free-text severity labels used by advisory databases
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "CRITICAL" => Some(Severity::Critical),
            "HIGH" => Some(Severity::High),
            "MODERATE" | "MEDIUM" => Some(Severity::Moderate),
            "LOW" => Some(Severity::Low),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Low => write!(f, "low"),
        }
    }
}

/// One advisory affecting one installed package
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Vulnerability {
    pub id: String,
    pub summary: String,
    pub severity: Severity,
    pub affected_package: String,
    pub affected_range: String,
    pub fixed_version: Option<String>,
    pub url: String,
    pub published: Option<String>,
}
