//! The five security checks and the contract they share.
//!
//! Each check reads its own settings from [`MonitorConfig`], inspects the project
//! through the [`RunContext`], and writes exactly one outcome into its
//! [`CheckScope`]. A disabled check writes nothing.

pub mod api;
pub mod database;
pub mod dependencies;
pub mod environment;
pub mod headers;

use crate::config::MonitorConfig;
use crate::context::RunContext;
use crate::report::CheckScope;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Configuration key of each check, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CheckName {
    DependencyAudit,
    EnvironmentVariables,
    SecurityHeaders,
    ApiSecurity,
    DatabaseSecurity,
}

impl CheckName {
    pub const ALL: [CheckName; 5] = [
        CheckName::DependencyAudit,
        CheckName::EnvironmentVariables,
        CheckName::SecurityHeaders,
        CheckName::ApiSecurity,
        CheckName::DatabaseSecurity,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CheckName::DependencyAudit => "dependencyAudit",
            CheckName::EnvironmentVariables => "environmentVariables",
            CheckName::SecurityHeaders => "securityHeaders",
            CheckName::ApiSecurity => "apiSecurity",
            CheckName::DatabaseSecurity => "databaseSecurity",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CheckName::DependencyAudit => "Dependency audit",
            CheckName::EnvironmentVariables => "Environment variables",
            CheckName::SecurityHeaders => "Security headers",
            CheckName::ApiSecurity => "API endpoint security",
            CheckName::DatabaseSecurity => "Database configuration",
        }
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single security inspection.
///
/// `run` returns `Err` only for conditions that make the inspection impossible
/// (the audit tool failing, an unreadable file). A missing file or directory is
/// an expected state and is reported as a `warn` outcome instead.
pub trait SecurityCheck {
    fn name(&self) -> CheckName;

    fn run(
        &self,
        config: &MonitorConfig,
        ctx: &RunContext,
        scope: &mut CheckScope<'_>,
    ) -> anyhow::Result<()>;
}

/// One instance of every check, in execution order.
pub fn registry() -> Vec<Box<dyn SecurityCheck>> {
    vec![
        Box::new(dependencies::DependencyAuditCheck),
        Box::new(environment::EnvironmentCheck),
        Box::new(headers::SecurityHeadersCheck),
        Box::new(api::ApiSecurityCheck),
        Box::new(database::DatabaseSecurityCheck),
    ]
}

/// File contents as text. Bytes that are not valid UTF-8 are replaced, so a stray
/// Latin-1 comment does not hide the rest of the file from substring matching.
fn read_source(path: &Path) -> anyhow::Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read '{}'", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// First needle found in `haystack`, ignoring empty needles.
fn first_match<'a>(haystack: &str, needles: &'a [String]) -> Option<&'a str> {
    needles
        .iter()
        .map(String::as_str)
        .find(|n| !n.is_empty() && haystack.contains(n))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_follows_check_name_order() {
        let names: Vec<CheckName> = registry().iter().map(|c| c.name()).collect();
        assert_eq!(names, CheckName::ALL.to_vec());
    }

    #[test]
    fn test_key_matches_serde_name() {
        for name in CheckName::ALL {
            let json = serde_json::to_value(name).unwrap();
            assert_eq!(json, name.key());
        }
    }

    #[test]
    fn test_first_match_skips_empty_needles() {
        let needles = vec![String::new(), "auth(".to_string()];
        assert_eq!(first_match("const s = auth();", &needles), Some("auth("));
        assert_eq!(first_match("nothing here", &needles), None);
    }

    #[test]
    fn test_read_source_tolerates_invalid_utf8() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("route.ts");
        std::fs::write(&path, b"// caf\xe9\nconst s = auth();\n").unwrap();

        let content = read_source(&path).unwrap();
        assert!(content.contains("auth("));
        assert!(content.contains('\u{FFFD}'));
    }

    #[test]
    fn test_read_source_reports_unreadable_path() {
        let tmp = tempfile::tempdir().unwrap();
        let err = read_source(&tmp.path().join("missing.ts")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to read"));
    }
}
