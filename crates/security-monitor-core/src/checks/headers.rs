use super::{read_source, CheckName, SecurityCheck};
use crate::config::MonitorConfig;
use crate::context::RunContext;
use crate::report::{CheckOutcome, CheckScope, CheckStatus, HeadersOutcome, MissingResource};

/// Looks for required HTTP security header names in the framework config file.
pub struct SecurityHeadersCheck;

impl SecurityCheck for SecurityHeadersCheck {
    fn name(&self) -> CheckName {
        CheckName::SecurityHeaders
    }

    fn run(
        &self,
        config: &MonitorConfig,
        ctx: &RunContext,
        scope: &mut CheckScope<'_>,
    ) -> anyhow::Result<()> {
        let Some(settings) = config.checks.security_headers.as_ref().filter(|c| c.enabled) else {
            return Ok(());
        };

        let path = ctx.resolve(&settings.config_file);
        if !path.is_file() {
            scope.warn(format!(
                "Security headers config file not found: {}",
                settings.config_file
            ));
            scope.record(CheckOutcome::Headers(HeadersOutcome::ConfigMissing {
                status: CheckStatus::Warn,
                missing: MissingResource::ConfigFile,
            }));
            return Ok(());
        }

        let content = read_source(&path)?;

        let (found, missing): (Vec<String>, Vec<String>) = settings
            .required_headers
            .iter()
            .cloned()
            .partition(|header| content.contains(header.as_str()));

        scope.record(CheckOutcome::Headers(HeadersOutcome::Scanned {
            status: CheckStatus::warn_if(!missing.is_empty()),
            found,
            missing,
        }));
        Ok(())
    }
}
