use super::{CheckName, SecurityCheck};
use crate::audit_tool::{command_line, parse_audit_output};
use crate::config::MonitorConfig;
use crate::context::RunContext;
use crate::report::{CheckOutcome, CheckScope, CheckStatus, DependencyOutcome, SeverityCounts};
use anyhow::Context;
use tracing::debug;

/// Runs `<packageManager> audit --json` and gates on per-severity thresholds.
///
/// This is the only check whose failure is a hard `fail`: any severity tier with
/// more advisories than its threshold fails the audit.
pub struct DependencyAuditCheck;

impl SecurityCheck for DependencyAuditCheck {
    fn name(&self) -> CheckName {
        CheckName::DependencyAudit
    }

    fn run(
        &self,
        config: &MonitorConfig,
        ctx: &RunContext,
        scope: &mut CheckScope<'_>,
    ) -> anyhow::Result<()> {
        let Some(settings) = config.checks.dependency_audit.as_ref().filter(|c| c.enabled) else {
            return Ok(());
        };

        let (program, args) = command_line(&config.package_manager, &settings.command);
        debug!(program = %program, args = ?args, "invoking dependency audit");

        let stdout = ctx
            .audit_runner()
            .run(&program, &args, ctx.root())
            .context("Dependency audit tool failed")?;
        let vulnerabilities = parse_audit_output(&stdout)?;

        let counts = SeverityCounts::tally(&vulnerabilities);
        let status = if counts.exceeds(&settings.severity_thresholds) {
            CheckStatus::Fail
        } else {
            CheckStatus::Pass
        };

        for vulnerability in vulnerabilities {
            scope.push_vulnerability(vulnerability);
        }
        scope.record(CheckOutcome::Dependencies(DependencyOutcome {
            status,
            counts,
            total: counts.total(),
            thresholds: settings.severity_thresholds,
        }));

        Ok(())
    }
}
