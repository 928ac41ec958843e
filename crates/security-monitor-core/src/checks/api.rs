use super::{first_match, read_source, CheckName, SecurityCheck};
use crate::config::{MonitorConfig, PatternMatching};
use crate::context::RunContext;
use crate::discovery::{discover_files, looks_like_glob, FileMatcher};
use crate::report::{
    ApiDetails, ApiOutcome, CheckOutcome, CheckScope, CheckStatus, MissingResource,
};
use tracing::warn;

/// Scans API route handlers for authentication and input validation.
pub struct ApiSecurityCheck;

impl SecurityCheck for ApiSecurityCheck {
    fn name(&self) -> CheckName {
        CheckName::ApiSecurity
    }

    fn run(
        &self,
        config: &MonitorConfig,
        ctx: &RunContext,
        scope: &mut CheckScope<'_>,
    ) -> anyhow::Result<()> {
        let Some(settings) = config.checks.api_security.as_ref().filter(|c| c.enabled) else {
            return Ok(());
        };

        let api_dir = ctx.resolve(&settings.api_directory);
        if !api_dir.is_dir() {
            scope.warn(format!("API directory not found: {}", settings.api_directory));
            scope.record(CheckOutcome::Api(ApiOutcome::DirectoryMissing {
                status: CheckStatus::Warn,
                missing: MissingResource::ApiDirectory,
            }));
            return Ok(());
        }

        if settings.pattern_matching == PatternMatching::Exact {
            let globs: Vec<&str> = settings
                .file_patterns
                .iter()
                .map(String::as_str)
                .filter(|p| looks_like_glob(p))
                .collect();
            if !globs.is_empty() {
                warn!(
                    patterns = ?globs,
                    "file patterns are compared as exact file names; set \"patternMatching\": \"glob\" to expand them"
                );
            }
        }

        let matcher = FileMatcher::new(&settings.file_patterns, settings.pattern_matching)?;
        let files = discover_files(&api_dir, &matcher)?;

        let mut details = ApiDetails::default();
        for file in &files {
            let content = read_source(file)?;
            let relative = file
                .strip_prefix(&api_dir)
                .unwrap_or(file.as_path())
                .to_string_lossy()
                .replace('\\', "/");

            if first_match(&content, &settings.auth_middleware).is_none() {
                details.unprotected.push(relative.clone());
            }
            if first_match(&content, &settings.validation_middleware).is_none() {
                details.missing_validation.push(relative);
            }
        }

        let has_gaps = !details.unprotected.is_empty() || !details.missing_validation.is_empty();
        scope.record(CheckOutcome::Api(ApiOutcome::Scanned {
            status: CheckStatus::warn_if(has_gaps),
            total_endpoints: files.len(),
            unprotected_endpoints: details.unprotected.len(),
            missing_validation: details.missing_validation.len(),
            details,
        }));
        Ok(())
    }
}
