use crate::checks::{self, SecurityCheck};
use crate::config::{ConfigError, MonitorConfig};
use crate::context::RunContext;
use crate::recommendations::derive_recommendations;
use crate::report::{CheckOutcome, CheckStatus, ErrorOutcome, SecurityReport};
use chrono::Utc;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Runs every registered check against one configuration.
pub struct Auditor {
    config: MonitorConfig,
    ctx: RunContext,
    checks: Vec<Box<dyn SecurityCheck>>,
}

impl Auditor {
    pub fn new(config: MonitorConfig, ctx: RunContext) -> Self {
        Self {
            config,
            ctx,
            checks: checks::registry(),
        }
    }

    /// Load the configuration at `path` and audit the current directory.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let config = MonitorConfig::load(path)?;
        Ok(Self::new(config, RunContext::new(".")))
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Run all checks in order, then derive recommendations.
    ///
    /// Never fails: a check that returns an error is recorded with an `error`
    /// status and the remaining checks still run.
    pub fn run(&self) -> SecurityReport {
        let mut report = SecurityReport::new(self.config.project.clone(), Utc::now());
        info!(
            project = %self.config.project.name,
            checks = self.checks.len(),
            "starting security checks"
        );

        for check in &self.checks {
            self.run_check(check.as_ref(), &mut report);
        }

        derive_recommendations(&mut report, &self.config.output);
        info!(
            vulnerabilities = report.vulnerabilities.len(),
            warnings = report.warnings.len(),
            recommendations = report.recommendations.len(),
            "security checks completed"
        );
        report
    }

    fn run_check(&self, check: &dyn SecurityCheck, report: &mut SecurityReport) {
        let name = check.name();
        if !self.config.checks.is_enabled(name) {
            debug!(check = %name, "check disabled, skipping");
            return;
        }

        info!(check = %name, "running {}", name.label());
        let mut scope = report.scope(name);
        match check.run(&self.config, &self.ctx, &mut scope) {
            Ok(()) => match scope.status() {
                Some(CheckStatus::Pass) => info!(check = %name, "check passed"),
                Some(status) => {
                    warn!(check = %name, status = status.symbol(), "check reported problems")
                }
                None => warn!(check = %name, "check completed without recording an outcome"),
            },
            Err(err) => {
                let message = format!("{:#}", err);
                error!(check = %name, error = %message, "check failed");
                scope.record(CheckOutcome::Error(ErrorOutcome::new(message)));
            }
        }
    }
}
