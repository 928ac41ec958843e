use super::{first_match, read_source, CheckName, SecurityCheck};
use crate::config::{DatabaseConfig, MonitorConfig};
use crate::context::RunContext;
use crate::report::{CheckOutcome, CheckScope, CheckStatus, DatabaseOutcome, MissingResource};

/// Inspects the database client setup for disabled TLS verification, unbounded pools and
/// missing timeouts.
pub struct DatabaseSecurityCheck;

impl SecurityCheck for DatabaseSecurityCheck {
    fn name(&self) -> CheckName {
        CheckName::DatabaseSecurity
    }

    fn run(
        &self,
        config: &MonitorConfig,
        ctx: &RunContext,
        scope: &mut CheckScope<'_>,
    ) -> anyhow::Result<()> {
        let Some(settings) = config.checks.database_security.as_ref().filter(|c| c.enabled) else {
            return Ok(());
        };

        let path = ctx.resolve(&settings.config_file);
        if !path.is_file() {
            scope.warn(format!(
                "Database config file not found: {}",
                settings.config_file
            ));
            scope.record(CheckOutcome::Database(DatabaseOutcome::ConfigMissing {
                status: CheckStatus::Warn,
                missing: MissingResource::DatabaseConfig,
            }));
            return Ok(());
        }

        let content = read_source(&path)?;
        let issues = inspect_database_config(settings, &content);

        scope.record(CheckOutcome::Database(DatabaseOutcome::Scanned {
            status: CheckStatus::warn_if(!issues.is_empty()),
            issues,
        }));
        Ok(())
    }
}

/// Issues found in the database config source, one per enabled sub-check.
pub fn inspect_database_config(settings: &DatabaseConfig, content: &str) -> Vec<String> {
    let mut issues = Vec::new();

    if settings.ssl_validation {
        if let Some(marker) = first_match(content, &settings.insecure_markers) {
            issues.push(format!(
                "SSL certificate validation is disabled ('{}')",
                marker
            ));
        }
    }

    if settings.connection_limits
        && first_match(content, &settings.connection_limit_markers).is_none()
    {
        issues.push("No connection pool limit configured".to_string());
    }

    if settings.timeouts && first_match(content, &settings.timeout_markers).is_none() {
        issues.push("No connection or query timeout configured".to_string());
    }

    issues
}
