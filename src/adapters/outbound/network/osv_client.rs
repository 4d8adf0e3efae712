use crate::health::domain::{Package, Severity, Vulnerability};
use crate::ports::outbound::VulnerabilityIndex;
use crate::shared::Result;
use async_trait::async_trait;
use futures::future::join_all;
use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

const API_BASE: &str = "https://api.osv.dev/v1";
const TIMEOUT_SECONDS: u64 = 15;
/// OSV API limit on queries per batch request
pub const MAX_BATCH_SIZE: usize = 100;
/// Concurrent advisory detail lookups
const MAX_CONCURRENT_DETAILS: usize = 10;

/// Transport for the two OSV endpoints the client needs
///
/// Separated from [`OsvClient`] so batching and mapping can be exercised
/// without a network.
#[async_trait]
pub trait OsvTransport: Send + Sync {
    /// `POST /v1/querybatch`
    async fn query_batch(&self, query: &OsvBatchQuery) -> Result<OsvBatchResponse>;

    /// `GET /v1/vulns/{id}`
    async fn fetch_vulnerability(&self, id: &str) -> Result<OsvVulnerability>;
}

/// HTTP transport against api.osv.dev
pub struct HttpOsvTransport {
    client: reqwest::Client,
    api_base: String,
}

impl HttpOsvTransport {
    pub fn new() -> Result<Self> {
        let user_agent = format!("dep-health/{}", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            api_base: API_BASE.to_string(),
        })
    }
}

#[async_trait]
impl OsvTransport for HttpOsvTransport {
    async fn query_batch(&self, query: &OsvBatchQuery) -> Result<OsvBatchResponse> {
        let url = format!("{}/querybatch", self.api_base);
        let response = self.client.post(&url).json(query).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("OSV API returned status code {}", response.status());
        }
        Ok(response.json().await?)
    }

    async fn fetch_vulnerability(&self, id: &str) -> Result<OsvVulnerability> {
        let url = format!("{}/vulns/{}", self.api_base, urlencoding::encode(id));
        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            anyhow::bail!(
                "OSV API returned status code {} for vulnerability {}",
                response.status(),
                id
            );
        }
        Ok(response.json().await?)
    }
}

/// OSV API client implementing the VulnerabilityIndex port
///
/// Packages are split into batches of [`MAX_BATCH_SIZE`]; all batches are in
/// flight at once and their results are reassembled in input order. A batch
/// that fails contributes empty results for its packages. The batch endpoint
/// only returns advisory ids, so advisories without details are hydrated
/// through the single-advisory endpoint.
pub struct OsvClient<T: OsvTransport = HttpOsvTransport> {
    transport: T,
}

impl OsvClient<HttpOsvTransport> {
    /// Creates a client against the public OSV API
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpOsvTransport::new()?))
    }
}

impl<T: OsvTransport> OsvClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Queries one batch; any failure yields one empty list per package
    async fn query_chunk(&self, chunk: &[Package]) -> Vec<Vec<OsvVulnerability>> {
        let query = OsvBatchQuery {
            queries: chunk
                .iter()
                .map(|pkg| OsvQuery {
                    package: OsvPackage {
                        name: pkg.name().to_string(),
                        ecosystem: pkg.ecosystem().osv_name().to_string(),
                    },
                    version: pkg.version().to_string(),
                })
                .collect(),
        };

        match self.transport.query_batch(&query).await {
            Ok(response) if response.results.len() == chunk.len() => {
                response.results.into_iter().map(|r| r.vulns).collect()
            }
            Ok(response) => {
                tracing::warn!(
                    expected = chunk.len(),
                    received = response.results.len(),
                    "OSV batch result count mismatch; discarding batch"
                );
                vec![Vec::new(); chunk.len()]
            }
            Err(e) => {
                tracing::warn!(packages = chunk.len(), error = %e, "OSV batch query failed");
                vec![Vec::new(); chunk.len()]
            }
        }
    }

    /// Fetches full records for advisories the batch returned without details
    async fn hydrate(&self, ids: HashSet<String>) -> HashMap<String, OsvVulnerability> {
        stream::iter(ids)
            .map(|id| async move {
                match self.transport.fetch_vulnerability(&id).await {
                    Ok(details) => Some((id, details)),
                    Err(e) => {
                        tracing::debug!(advisory = %id, error = %e, "advisory details unavailable");
                        None
                    }
                }
            })
            .buffer_unordered(MAX_CONCURRENT_DETAILS)
            .filter_map(|entry| async move { entry })
            .collect()
            .await
    }
}

#[async_trait]
impl<T: OsvTransport> VulnerabilityIndex for OsvClient<T> {
    async fn query(&self, packages: &[Package]) -> Vec<Vec<Vulnerability>> {
        if packages.is_empty() {
            return Vec::new();
        }

        let batches = join_all(
            packages
                .chunks(MAX_BATCH_SIZE)
                .map(|chunk| self.query_chunk(chunk)),
        )
        .await;
        let raw: Vec<Vec<OsvVulnerability>> = batches.into_iter().flatten().collect();

        let missing: HashSet<String> = raw
            .iter()
            .flatten()
            .filter(|v| !v.has_details())
            .map(|v| v.id.clone())
            .collect();
        let details = self.hydrate(missing).await;

        packages
            .iter()
            .zip(raw)
            .map(|(package, vulns)| {
                vulns
                    .into_iter()
                    .map(|v| {
                        let record = details.get(&v.id).unwrap_or(&v);
                        to_vulnerability(package, record)
                    })
                    .collect()
            })
            .collect()
    }
}

// OSV API request/response structures

#[derive(Debug, Serialize)]
pub struct OsvBatchQuery {
    queries: Vec<OsvQuery>,
}

impl OsvBatchQuery {
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Queried package names in request order
    pub fn package_names(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|q| q.package.name.as_str())
    }
}

#[derive(Debug, Serialize)]
struct OsvQuery {
    package: OsvPackage,
    version: String,
}

#[derive(Debug, Serialize)]
struct OsvPackage {
    name: String,
    ecosystem: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsvBatchResponse {
    #[serde(default)]
    pub results: Vec<OsvResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OsvResult {
    #[serde(default)]
    pub vulns: Vec<OsvVulnerability>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsvVulnerability {
    pub id: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub published: Option<String>,
    #[serde(default)]
    severity: Vec<OsvSeverity>,
    #[serde(default)]
    database_specific: Option<DatabaseSpecific>,
    #[serde(default)]
    affected: Vec<OsvAffected>,
    #[serde(default)]
    references: Vec<OsvReference>,
}

impl OsvVulnerability {
    /// Batch responses carry only `id` and `modified`
    fn has_details(&self) -> bool {
        self.summary.is_some() || !self.affected.is_empty() || !self.severity.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
struct OsvSeverity {
    #[serde(rename = "type")]
    severity_type: String,
    score: String,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSpecific {
    #[serde(default)]
    severity: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OsvAffected {
    #[serde(default)]
    package: Option<OsvAffectedPackage>,
    #[serde(default)]
    ranges: Vec<OsvRange>,
}

#[derive(Debug, Clone, Deserialize)]
struct OsvAffectedPackage {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct OsvRange {
    #[serde(default)]
    events: Vec<OsvEvent>,
}

#[derive(Debug, Clone, Deserialize)]
struct OsvEvent {
    #[serde(default)]
    introduced: Option<String>,
    #[serde(default)]
    fixed: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct OsvReference {
    url: String,
}

/// Maps an OSV record onto the domain model for the package it was found for
fn to_vulnerability(package: &Package, osv: &OsvVulnerability) -> Vulnerability {
    let affected = osv
        .affected
        .iter()
        .find(|a| {
            a.package
                .as_ref()
                .is_some_and(|p| p.name.eq_ignore_ascii_case(package.name()))
        })
        .or_else(|| osv.affected.first());

    let fixed_version = affected.and_then(|a| {
        a.ranges
            .iter()
            .flat_map(|r| &r.events)
            .find_map(|e| e.fixed.clone())
    });

    let affected_range = affected
        .and_then(|a| a.ranges.first())
        .and_then(|r| describe_range(&r.events))
        .unwrap_or_else(|| package.version().to_string());

    let url = osv
        .references
        .first()
        .map(|r| r.url.clone())
        .unwrap_or_else(|| format!("https://osv.dev/vulnerability/{}", osv.id));

    let summary = osv
        .summary
        .clone()
        .or_else(|| {
            osv.details
                .as_deref()
                .and_then(|d| d.lines().next())
                .map(str::to_string)
        })
        .unwrap_or_default();

    Vulnerability {
        id: osv.id.clone(),
        summary,
        severity: severity_of(osv),
        affected_package: package.name().to_string(),
        affected_range,
        fixed_version,
        url,
        published: osv.published.clone(),
    }
}

/// Score, then database label, then the moderate default
fn severity_of(osv: &OsvVulnerability) -> Severity {
    let score = osv.severity.iter().find_map(|s| {
        s.score.trim().parse::<f64>().ok().or_else(|| {
            (s.severity_type == "CVSS_V3" || s.score.starts_with("CVSS:3"))
                .then(|| parse_cvss_score(&s.score))
                .flatten()
        })
    });

    if score.is_some() {
        return Severity::from_score(score);
    }

    osv.database_specific
        .as_ref()
        .and_then(|db| db.severity.as_deref())
        .and_then(Severity::from_label)
        .unwrap_or(Severity::Moderate)
}

/// `>=introduced, <fixed` from a range's events
fn describe_range(events: &[OsvEvent]) -> Option<String> {
    let introduced = events
        .iter()
        .find_map(|e| e.introduced.as_deref())
        .filter(|v| *v != "0");
    let fixed = events.iter().find_map(|e| e.fixed.as_deref());

    match (introduced, fixed) {
        (Some(i), Some(f)) => Some(format!(">={}, <{}", i, f)),
        (None, Some(f)) => Some(format!("<{}", f)),
        (Some(i), None) => Some(format!(">={}", i)),
        (None, None) => None,
    }
}

/// Computes the CVSS v3 base score from a vector string
///
/// Example: "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H" -> Some(9.8)
fn parse_cvss_score(cvss_vector: &str) -> Option<f64> {
    let metrics: HashMap<&str, &str> = cvss_vector
        .split('/')
        .skip(1)
        .filter_map(|part| part.split_once(':'))
        .collect();

    let scope_changed = match *metrics.get("S")? {
        "U" => false,
        "C" => true,
        _ => return None,
    };

    let av = match *metrics.get("AV")? {
        "N" => 0.85,
        "A" => 0.62,
        "L" => 0.55,
        "P" => 0.2,
        _ => return None,
    };
    let ac = match *metrics.get("AC")? {
        "L" => 0.77,
        "H" => 0.44,
        _ => return None,
    };
    let pr = match (*metrics.get("PR")?, scope_changed) {
        ("N", _) => 0.85,
        ("L", false) => 0.62,
        ("L", true) => 0.68,
        ("H", false) => 0.27,
        ("H", true) => 0.5,
        _ => return None,
    };
    let ui = match *metrics.get("UI")? {
        "N" => 0.85,
        "R" => 0.62,
        _ => return None,
    };
    let cia = |key: &str| -> Option<f64> {
        match *metrics.get(key)? {
            "N" => Some(0.0),
            "L" => Some(0.22),
            "H" => Some(0.56),
            _ => None,
        }
    };
    let (c, i, a) = (cia("C")?, cia("I")?, cia("A")?);

    let iss = 1.0 - ((1.0 - c) * (1.0 - i) * (1.0 - a));
    let impact = if scope_changed {
        7.52 * (iss - 0.029) - 3.25 * (iss - 0.02_f64).powi(15)
    } else {
        6.42 * iss
    };
    let exploitability = 8.22 * av * ac * pr * ui;

    let base = if impact <= 0.0 {
        0.0
    } else if scope_changed {
        f64::min(1.08 * (impact + exploitability), 10.0)
    } else {
        f64::min(impact + exploitability, 10.0)
    };

    // CVSS rounds up to one decimal
    Some((base * 10.0).ceil() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::domain::Ecosystem;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Transport returning one advisory named after each queried package
    #[derive(Default)]
    struct RecordingTransport {
        batch_calls: AtomicUsize,
        detail_calls: AtomicUsize,
        batch_sizes: Mutex<Vec<usize>>,
        fail_batch: Option<usize>,
    }

    #[async_trait]
    impl OsvTransport for RecordingTransport {
        async fn query_batch(&self, query: &OsvBatchQuery) -> Result<OsvBatchResponse> {
            let call = self.batch_calls.fetch_add(1, Ordering::SeqCst);
            self.batch_sizes.lock().unwrap().push(query.len());
            if self.fail_batch == Some(call) {
                anyhow::bail!("simulated timeout");
            }
            Ok(OsvBatchResponse {
                results: query
                    .package_names()
                    .map(|name| OsvResult {
                        vulns: vec![OsvVulnerability {
                            id: format!("OSV-{}", name),
                            summary: Some(format!("issue in {}", name)),
                            ..Default::default()
                        }],
                    })
                    .collect(),
            })
        }

        async fn fetch_vulnerability(&self, id: &str) -> Result<OsvVulnerability> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            Ok(serde_json::from_str(&format!(
                r#"{{"id":"{}","summary":"hydrated","database_specific":{{"severity":"HIGH"}}}}"#,
                id
            ))?)
        }
    }

    fn packages(count: usize) -> Vec<Package> {
        (0..count)
            .map(|i| Package::new(format!("pkg-{}", i), "1.0.0".to_string(), Ecosystem::Npm).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_250_packages_make_three_positional_batches() {
        let client = OsvClient::with_transport(RecordingTransport::default());
        let pkgs = packages(250);

        let results = client.query(&pkgs).await;

        assert_eq!(client.transport.batch_calls.load(Ordering::SeqCst), 3);
        let mut sizes = client.transport.batch_sizes.lock().unwrap().clone();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![50, 100, 100]);

        assert_eq!(results.len(), 250);
        for (pkg, vulns) in pkgs.iter().zip(&results) {
            assert_eq!(vulns.len(), 1);
            assert_eq!(vulns[0].id, format!("OSV-{}", pkg.name()));
            assert_eq!(vulns[0].affected_package, pkg.name());
        }
    }

    #[tokio::test]
    async fn test_failed_batch_yields_empty_results_for_its_packages() {
        let transport = RecordingTransport {
            fail_batch: Some(0),
            ..Default::default()
        };
        let client = OsvClient::with_transport(transport);
        let results = client.query(&packages(150)).await;

        assert_eq!(results.len(), 150);
        let empty = results.iter().filter(|v| v.is_empty()).count();
        // whichever batch was dispatched first failed
        assert!(empty == 100 || empty == 50);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_requests() {
        let client = OsvClient::with_transport(RecordingTransport::default());
        assert!(client.query(&[]).await.is_empty());
        assert_eq!(client.transport.batch_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_ids_without_details_are_hydrated() {
        struct IdOnly(RecordingTransport);

        #[async_trait]
        impl OsvTransport for IdOnly {
            async fn query_batch(&self, query: &OsvBatchQuery) -> Result<OsvBatchResponse> {
                Ok(OsvBatchResponse {
                    results: query
                        .package_names()
                        .map(|_| OsvResult {
                            vulns: vec![OsvVulnerability {
                                id: "GHSA-shared".to_string(),
                                ..Default::default()
                            }],
                        })
                        .collect(),
                })
            }

            async fn fetch_vulnerability(&self, id: &str) -> Result<OsvVulnerability> {
                self.0.fetch_vulnerability(id).await
            }
        }

        let client = OsvClient::with_transport(IdOnly(RecordingTransport::default()));
        let results = client.fetch_vulnerabilities(&packages(3)).await;

        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|v| v.summary == "hydrated"));
        assert!(results.iter().all(|v| v.severity == Severity::High));
        // the shared advisory is fetched once
        assert_eq!(client.transport.0.detail_calls.load(Ordering::SeqCst), 1);
    }

    fn package(name: &str, version: &str) -> Package {
        Package::new(name.to_string(), version.to_string(), Ecosystem::Npm).unwrap()
    }

    #[test]
    fn test_to_vulnerability_full_record() {
        let osv: OsvVulnerability = serde_json::from_str(
            r#"{
                "id": "GHSA-8gc5-j5rx-235r",
                "summary": "SSR XSS",
                "published": "2024-03-19T00:00:00Z",
                "severity": [{"type": "CVSS_V3", "score": "CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"}],
                "affected": [
                    {"package": {"name": "other"}, "ranges": [{"events": [{"introduced": "0"}, {"fixed": "9.9.9"}]}]},
                    {"package": {"name": "svelte"}, "ranges": [{"type": "SEMVER", "events": [{"introduced": "4.0.0"}, {"fixed": "4.2.19"}]}]}
                ],
                "references": [{"type": "ADVISORY", "url": "https://github.com/advisories/GHSA-8gc5-j5rx-235r"}]
            }"#,
        )
        .unwrap();

        let vuln = to_vulnerability(&package("svelte", "4.2.0"), &osv);
        assert_eq!(vuln.severity, Severity::Critical);
        assert_eq!(vuln.fixed_version.as_deref(), Some("4.2.19"));
        assert_eq!(vuln.affected_range, ">=4.0.0, <4.2.19");
        assert_eq!(vuln.url, "https://github.com/advisories/GHSA-8gc5-j5rx-235r");
        assert_eq!(vuln.published.as_deref(), Some("2024-03-19T00:00:00Z"));
    }

    #[test]
    fn test_to_vulnerability_minimal_record_defaults() {
        let osv = OsvVulnerability {
            id: "PYSEC-2024-1".to_string(),
            ..Default::default()
        };
        let vuln = to_vulnerability(&package("requests", "2.0.0"), &osv);
        assert_eq!(vuln.severity, Severity::Moderate);
        assert_eq!(vuln.url, "https://osv.dev/vulnerability/PYSEC-2024-1");
        assert_eq!(vuln.affected_range, "2.0.0");
        assert!(vuln.fixed_version.is_none());
    }

    #[test]
    fn test_severity_numeric_score_and_label_fallback() {
        let numeric: OsvVulnerability = serde_json::from_str(
            r#"{"id": "X", "severity": [{"type": "CVSS_V3", "score": "7.5"}]}"#,
        )
        .unwrap();
        assert_eq!(severity_of(&numeric), Severity::High);

        let v4_with_label: OsvVulnerability = serde_json::from_str(
            r#"{"id": "Y", "severity": [{"type": "CVSS_V4", "score": "CVSS:4.0/AV:N"}], "database_specific": {"severity": "LOW"}}"#,
        )
        .unwrap();
        assert_eq!(severity_of(&v4_with_label), Severity::Low);
    }

    #[test]
    fn test_parse_cvss_score_values() {
        assert_eq!(
            parse_cvss_score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:H/I:H/A:H"),
            Some(9.8)
        );
        assert_eq!(
            parse_cvss_score("CVSS:3.1/AV:N/AC:L/PR:L/UI:N/S:U/C:H/I:H/A:H"),
            Some(8.8)
        );
        assert_eq!(
            parse_cvss_score("CVSS:3.1/AV:N/AC:L/PR:N/UI:N/S:U/C:N/I:N/A:N"),
            Some(0.0)
        );
        let low = parse_cvss_score("CVSS:3.1/AV:L/AC:H/PR:H/UI:R/S:U/C:L/I:N/A:N").unwrap();
        assert!(low > 0.0 && low < 4.0);
        assert_eq!(parse_cvss_score("invalid vector"), None);
    }

    #[test]
    fn test_batch_query_serializes_osv_ecosystem() {
        let query = OsvBatchQuery {
            queries: vec![OsvQuery {
                package: OsvPackage {
                    name: "serde".to_string(),
                    ecosystem: Ecosystem::CratesIo.osv_name().to_string(),
                },
                version: "1.0.197".to_string(),
            }],
        };
        let json = serde_json::to_string(&query).unwrap();
        assert_eq!(
            json,
            r#"{"queries":[{"package":{"name":"serde","ecosystem":"crates.io"},"version":"1.0.197"}]}"#
        );
    }
}
