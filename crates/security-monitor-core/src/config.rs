use crate::checks::CheckName;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Config file looked up when none is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "security-monitor.config.json";

/// Reasons a configuration file cannot be used. All of them abort the run.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}'", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}'", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file '{}' has no \"checks\" section", path.display())]
    MissingChecks { path: PathBuf },
}

/// Monitor configuration loaded from `security-monitor.config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitorConfig {
    #[serde(default)]
    pub project: ProjectInfo,

    /// Program used to run the dependency audit (e.g. "npm", "pnpm", "yarn")
    #[serde(default = "default_package_manager")]
    pub package_manager: String,

    pub checks: ChecksConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            project: ProjectInfo::default(),
            package_manager: default_package_manager(),
            checks: ChecksConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl MonitorConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse configuration JSON. `source` is only used in error messages.
    pub fn parse(content: &str, source: &Path) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|error| ConfigError::Parse {
                path: source.to_path_buf(),
                source: error,
            })?;

        if value.get("checks").is_none() {
            return Err(ConfigError::MissingChecks {
                path: source.to_path_buf(),
            });
        }

        serde_json::from_value(value).map_err(|error| ConfigError::Parse {
            path: source.to_path_buf(),
            source: error,
        })
    }
}

/// Identity of the audited project, copied verbatim into the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
}

/// Per-check settings. A check without an entry is disabled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecksConfig {
    #[serde(default)]
    pub dependency_audit: Option<DependencyAuditConfig>,
    #[serde(default)]
    pub environment_variables: Option<EnvironmentConfig>,
    #[serde(default)]
    pub security_headers: Option<HeadersConfig>,
    #[serde(default)]
    pub api_security: Option<ApiSecurityConfig>,
    #[serde(default)]
    pub database_security: Option<DatabaseConfig>,
}

impl ChecksConfig {
    pub fn is_enabled(&self, name: CheckName) -> bool {
        match name {
            CheckName::DependencyAudit => self.dependency_audit.as_ref().is_some_and(|c| c.enabled),
            CheckName::EnvironmentVariables => {
                self.environment_variables.as_ref().is_some_and(|c| c.enabled)
            }
            CheckName::SecurityHeaders => self.security_headers.as_ref().is_some_and(|c| c.enabled),
            CheckName::ApiSecurity => self.api_security.as_ref().is_some_and(|c| c.enabled),
            CheckName::DatabaseSecurity => {
                self.database_security.as_ref().is_some_and(|c| c.enabled)
            }
        }
    }

    /// Enable or disable a check, creating its settings with defaults if needed.
    pub fn set_enabled(&mut self, name: CheckName, enabled: bool) {
        match name {
            CheckName::DependencyAudit => {
                self.dependency_audit.get_or_insert_with(Default::default).enabled = enabled
            }
            CheckName::EnvironmentVariables => {
                self.environment_variables
                    .get_or_insert_with(Default::default)
                    .enabled = enabled
            }
            CheckName::SecurityHeaders => {
                self.security_headers.get_or_insert_with(Default::default).enabled = enabled
            }
            CheckName::ApiSecurity => {
                self.api_security.get_or_insert_with(Default::default).enabled = enabled
            }
            CheckName::DatabaseSecurity => {
                self.database_security.get_or_insert_with(Default::default).enabled = enabled
            }
        }
    }
}

/// Maximum number of advisories allowed per severity tier before the audit fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityThresholds {
    pub critical: usize,
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
}

impl Default for SeverityThresholds {
    fn default() -> Self {
        Self {
            critical: 0,
            high: 0,
            moderate: 5,
            low: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DependencyAuditConfig {
    pub enabled: bool,
    /// Arguments passed to the package manager, split on whitespace
    pub command: String,
    pub severity_thresholds: SeverityThresholds,
}

impl Default for DependencyAuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            command: "audit --json".to_string(),
            severity_thresholds: SeverityThresholds::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnvironmentConfig {
    pub enabled: bool,
    pub required: Vec<String>,
    pub min_length: usize,
    /// Case-insensitive substrings that mark a short value as a placeholder secret
    pub insecure_patterns: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            required: Vec::new(),
            min_length: 32,
            insecure_patterns: strings(&[
                "password", "secret", "123456", "test", "changeme", "admin",
            ]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HeadersConfig {
    pub enabled: bool,
    pub config_file: String,
    pub required_headers: Vec<String>,
}

impl Default for HeadersConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            config_file: "next.config.mjs".to_string(),
            required_headers: strings(&[
                "X-Frame-Options",
                "X-Content-Type-Options",
                "Referrer-Policy",
                "Content-Security-Policy",
                "Strict-Transport-Security",
            ]),
        }
    }
}

/// How `filePatterns` entries are compared against file names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternMatching {
    /// Whole file name must equal the pattern string
    #[default]
    Exact,
    /// Pattern is a shell glob matched against the file name
    Glob,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiSecurityConfig {
    pub enabled: bool,
    pub api_directory: String,
    pub file_patterns: Vec<String>,
    pub pattern_matching: PatternMatching,
    pub auth_middleware: Vec<String>,
    pub validation_middleware: Vec<String>,
}

impl Default for ApiSecurityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_directory: "app/api".to_string(),
            file_patterns: strings(&["route.ts", "route.js"]),
            pattern_matching: PatternMatching::Exact,
            auth_middleware: strings(&["getServerSession", "auth(", "requireAuth", "verifyToken"]),
            validation_middleware: strings(&["zod", "validate", ".parse("]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseConfig {
    pub enabled: bool,
    pub config_file: String,
    pub ssl_validation: bool,
    pub connection_limits: bool,
    pub timeouts: bool,
    pub insecure_markers: Vec<String>,
    pub connection_limit_markers: Vec<String>,
    pub timeout_markers: Vec<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            config_file: "lib/database.ts".to_string(),
            ssl_validation: true,
            connection_limits: true,
            timeouts: true,
            insecure_markers: strings(&[
                "rejectUnauthorized: false",
                "sslmode=disable",
                "ssl: false",
            ]),
            connection_limit_markers: strings(&["max:", "connectionLimit", "pool"]),
            timeout_markers: strings(&["timeout", "Timeout"]),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OutputConfig {
    pub report_file: String,
    pub log_level: String,
    pub include_recommendations: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_file: "security-report.json".to_string(),
            log_level: "info".to_string(),
            include_recommendations: true,
        }
    }
}

fn default_package_manager() -> String {
    "npm".to_string()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
