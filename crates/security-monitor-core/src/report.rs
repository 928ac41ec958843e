use crate::checks::CheckName;
use crate::config::{ProjectInfo, SeverityThresholds};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Outcome status of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Error,
}

impl CheckStatus {
    pub fn symbol(&self) -> &str {
        match self {
            CheckStatus::Pass => "PASS",
            CheckStatus::Warn => "WARN",
            CheckStatus::Fail => "FAIL",
            CheckStatus::Error => "ERROR",
        }
    }

    /// `Warn` when `has_problems`, `Pass` otherwise.
    pub fn warn_if(has_problems: bool) -> Self {
        if has_problems {
            CheckStatus::Warn
        } else {
            CheckStatus::Pass
        }
    }
}

/// Advisory severity as reported by the package manager's audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VulnerabilitySeverity {
    Critical,
    High,
    Moderate,
    Low,
    Info,
}

impl VulnerabilitySeverity {
    /// Unknown labels are treated as informational.
    pub fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "critical" => VulnerabilitySeverity::Critical,
            "high" => VulnerabilitySeverity::High,
            "moderate" | "medium" => VulnerabilitySeverity::Moderate,
            "low" => VulnerabilitySeverity::Low,
            _ => VulnerabilitySeverity::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vulnerability {
    pub package: String,
    pub severity: VulnerabilitySeverity,
    pub title: String,
    pub description: String,
    pub remediation: String,
}

/// Number of advisories per severity tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeverityCounts {
    pub critical: usize,
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
    pub info: usize,
}

impl SeverityCounts {
    pub fn tally(vulnerabilities: &[Vulnerability]) -> Self {
        let mut counts = Self::default();
        for vulnerability in vulnerabilities {
            match vulnerability.severity {
                VulnerabilitySeverity::Critical => counts.critical += 1,
                VulnerabilitySeverity::High => counts.high += 1,
                VulnerabilitySeverity::Moderate => counts.moderate += 1,
                VulnerabilitySeverity::Low => counts.low += 1,
                VulnerabilitySeverity::Info => counts.info += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.moderate + self.low + self.info
    }

    /// True when any tier strictly exceeds its threshold. Info is never gated.
    pub fn exceeds(&self, thresholds: &SeverityThresholds) -> bool {
        self.critical > thresholds.critical
            || self.high > thresholds.high
            || self.moderate > thresholds.moderate
            || self.low > thresholds.low
    }
}

/// Fixed marker recorded in place of a result list when the inspected resource is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingResource {
    ConfigFile,
    ApiDirectory,
    DatabaseConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyOutcome {
    pub status: CheckStatus,
    pub counts: SeverityCounts,
    pub total: usize,
    pub thresholds: SeverityThresholds,
}

/// Why an environment variable was flagged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum InsecureReason {
    #[serde(rename_all = "camelCase")]
    TooShort { length: usize, min_length: usize },
    InsecurePattern { pattern: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsecureVariable {
    pub name: String,
    #[serde(flatten)]
    pub reason: InsecureReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentOutcome {
    pub status: CheckStatus,
    pub missing: Vec<String>,
    pub insecure: Vec<InsecureVariable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum HeadersOutcome {
    ConfigMissing {
        status: CheckStatus,
        missing: MissingResource,
    },
    Scanned {
        status: CheckStatus,
        found: Vec<String>,
        missing: Vec<String>,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiDetails {
    pub unprotected: Vec<String>,
    pub missing_validation: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ApiOutcome {
    DirectoryMissing {
        status: CheckStatus,
        missing: MissingResource,
    },
    #[serde(rename_all = "camelCase")]
    Scanned {
        status: CheckStatus,
        total_endpoints: usize,
        unprotected_endpoints: usize,
        missing_validation: usize,
        details: ApiDetails,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DatabaseOutcome {
    ConfigMissing {
        status: CheckStatus,
        missing: MissingResource,
    },
    Scanned {
        status: CheckStatus,
        issues: Vec<String>,
    },
}

/// Recorded by the orchestrator when a check returns an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorOutcome {
    pub status: CheckStatus,
    pub error: String,
}

impl ErrorOutcome {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Error,
            error: error.into(),
        }
    }
}

/// Outcome record of one check, serialized as the check's own JSON shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CheckOutcome {
    Dependencies(DependencyOutcome),
    Environment(EnvironmentOutcome),
    Headers(HeadersOutcome),
    Api(ApiOutcome),
    Database(DatabaseOutcome),
    Error(ErrorOutcome),
}

impl CheckOutcome {
    pub fn status(&self) -> CheckStatus {
        match self {
            CheckOutcome::Dependencies(o) => o.status,
            CheckOutcome::Environment(o) => o.status,
            CheckOutcome::Headers(HeadersOutcome::ConfigMissing { status, .. })
            | CheckOutcome::Headers(HeadersOutcome::Scanned { status, .. }) => *status,
            CheckOutcome::Api(ApiOutcome::DirectoryMissing { status, .. })
            | CheckOutcome::Api(ApiOutcome::Scanned { status, .. }) => *status,
            CheckOutcome::Database(DatabaseOutcome::ConfigMissing { status, .. })
            | CheckOutcome::Database(DatabaseOutcome::Scanned { status, .. }) => *status,
            CheckOutcome::Error(o) => o.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
}

impl Priority {
    pub fn symbol(&self) -> &str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationCategory {
    Dependencies,
    Environment,
    Api,
    Headers,
    Database,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub priority: Priority,
    pub category: RecommendationCategory,
    pub title: String,
    pub description: String,
}

/// Result accumulator for one monitor run.
///
/// One instance is created per run by the [`Auditor`](crate::Auditor) and lent out
/// mutably to one check at a time, then to the recommendation deriver. Only the
/// current holder of the `&mut` borrow may write; checks therefore never observe
/// each other's writes in progress. Running checks concurrently would need
/// per-check partial reports merged afterwards, or a lock around every append.
#[derive(Debug, Clone, Serialize)]
pub struct SecurityReport {
    pub timestamp: DateTime<Utc>,
    pub project: ProjectInfo,
    pub checks: BTreeMap<CheckName, CheckOutcome>,
    pub vulnerabilities: Vec<Vulnerability>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<Recommendation>,
}

impl SecurityReport {
    pub fn new(project: ProjectInfo, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            project,
            checks: BTreeMap::new(),
            vulnerabilities: Vec::new(),
            warnings: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    /// Write handle bound to a single check's entry.
    pub fn scope(&mut self, name: CheckName) -> CheckScope<'_> {
        CheckScope { name, report: self }
    }

    pub fn outcome(&self, name: CheckName) -> Option<&CheckOutcome> {
        self.checks.get(&name)
    }

    pub fn status(&self, name: CheckName) -> Option<CheckStatus> {
        self.outcome(name).map(CheckOutcome::status)
    }

    pub fn status_count(&self, status: CheckStatus) -> usize {
        self.checks.values().filter(|o| o.status() == status).count()
    }

    /// True when a check failed its gate or could not run.
    pub fn has_failures(&self) -> bool {
        self.checks
            .values()
            .any(|o| matches!(o.status(), CheckStatus::Fail | CheckStatus::Error))
    }

    /// Write the report as pretty-printed JSON, creating parent directories.
    pub fn write_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report '{}'", path.display()))?;
        Ok(())
    }
}

/// Mutable view of a [`SecurityReport`] handed to one check.
///
/// The outcome slot is fixed to the check's own name, so a check cannot overwrite
/// another check's entry. Warnings and vulnerabilities are append-only.
pub struct CheckScope<'a> {
    name: CheckName,
    report: &'a mut SecurityReport,
}

impl CheckScope<'_> {
    pub fn name(&self) -> CheckName {
        self.name
    }

    pub fn record(&mut self, outcome: CheckOutcome) {
        self.report.checks.insert(self.name, outcome);
    }

    pub fn status(&self) -> Option<CheckStatus> {
        self.report.status(self.name)
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.report.warnings.push(message.into());
    }

    pub fn push_vulnerability(&mut self, vulnerability: Vulnerability) {
        self.report.vulnerabilities.push(vulnerability);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vuln(severity: VulnerabilitySeverity) -> Vulnerability {
        Vulnerability {
            package: "left-pad".into(),
            severity,
            title: "t".into(),
            description: "d".into(),
            remediation: "r".into(),
        }
    }

    fn empty_report() -> SecurityReport {
        SecurityReport::new(ProjectInfo::default(), Utc::now())
    }

    #[test]
    fn test_thresholds_are_strict_upper_bounds() {
        let thresholds = SeverityThresholds::default();
        let at_limit = SeverityCounts {
            moderate: 5,
            low: 10,
            ..Default::default()
        };
        assert!(!at_limit.exceeds(&thresholds));

        let over = SeverityCounts {
            low: 11,
            ..Default::default()
        };
        assert!(over.exceeds(&thresholds));

        let one_critical = SeverityCounts {
            critical: 1,
            ..Default::default()
        };
        assert!(one_critical.exceeds(&thresholds));
    }

    #[test]
    fn test_info_is_never_gated() {
        let counts = SeverityCounts {
            info: 500,
            ..Default::default()
        };
        assert!(!counts.exceeds(&SeverityThresholds::default()));
        assert_eq!(counts.total(), 500);
    }

    #[test]
    fn test_tally_counts_each_tier() {
        let vulns = vec![
            vuln(VulnerabilitySeverity::High),
            vuln(VulnerabilitySeverity::High),
            vuln(VulnerabilitySeverity::Low),
        ];
        let counts = SeverityCounts::tally(&vulns);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_severity_parse_is_lenient() {
        assert_eq!(VulnerabilitySeverity::parse("CRITICAL"), VulnerabilitySeverity::Critical);
        assert_eq!(VulnerabilitySeverity::parse("medium"), VulnerabilitySeverity::Moderate);
        assert_eq!(VulnerabilitySeverity::parse("unknown"), VulnerabilitySeverity::Info);
    }

    #[test]
    fn test_scope_writes_only_its_own_entry() {
        let mut report = empty_report();
        report
            .scope(CheckName::ApiSecurity)
            .record(CheckOutcome::Error(ErrorOutcome::new("boom")));
        report.scope(CheckName::SecurityHeaders).warn("headers missing");

        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.status(CheckName::ApiSecurity), Some(CheckStatus::Error));
        assert_eq!(report.status(CheckName::SecurityHeaders), None);
        assert_eq!(report.warnings, vec!["headers missing".to_string()]);
    }

    #[test]
    fn test_sentinel_serializes_as_string() {
        let outcome = CheckOutcome::Headers(HeadersOutcome::ConfigMissing {
            status: CheckStatus::Warn,
            missing: MissingResource::ConfigFile,
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json, serde_json::json!({"status": "warn", "missing": "config_file"}));
    }

    #[test]
    fn test_api_outcome_uses_camel_case_keys() {
        let outcome = CheckOutcome::Api(ApiOutcome::Scanned {
            status: CheckStatus::Warn,
            total_endpoints: 2,
            unprotected_endpoints: 1,
            missing_validation: 0,
            details: ApiDetails {
                unprotected: vec!["users/route.ts".into()],
                missing_validation: Vec::new(),
            },
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["unprotectedEndpoints"], 1);
        assert_eq!(json["totalEndpoints"], 2);
        assert_eq!(json["details"]["unprotected"][0], "users/route.ts");
        assert!(json["details"]["missingValidation"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_insecure_variable_flattens_reason() {
        let variable = InsecureVariable {
            name: "API_KEY".into(),
            reason: InsecureReason::InsecurePattern {
                pattern: "test".into(),
            },
        };
        let json = serde_json::to_value(&variable).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "API_KEY", "reason": "insecure_pattern", "pattern": "test"})
        );
    }

    #[test]
    fn test_checks_serialize_in_check_order() {
        let mut report = empty_report();
        report
            .scope(CheckName::DatabaseSecurity)
            .record(CheckOutcome::Error(ErrorOutcome::new("x")));
        report
            .scope(CheckName::DependencyAudit)
            .record(CheckOutcome::Error(ErrorOutcome::new("y")));
        let json = serde_json::to_string(&report).unwrap();
        let dep = json.find("\"dependencyAudit\"").unwrap();
        let db = json.find("\"databaseSecurity\"").unwrap();
        assert!(dep < db);
    }

    #[test]
    fn test_write_to_creates_parent_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("reports/nested/security-report.json");
        empty_report().write_to(&path).unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(written["checks"].as_object().unwrap().is_empty());
        assert!(written["timestamp"].is_string());
    }
}
