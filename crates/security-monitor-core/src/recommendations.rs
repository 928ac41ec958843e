use crate::checks::CheckName;
use crate::config::OutputConfig;
use crate::report::{
    ApiOutcome, CheckOutcome, DatabaseOutcome, HeadersOutcome, Priority, Recommendation,
    RecommendationCategory, SecurityReport,
};

/// Append prioritized recommendations derived from the check outcomes.
///
/// At most one recommendation per category, always in the order dependencies,
/// environment, api, headers, database. Does nothing when recommendations are
/// disabled in the output settings.
pub fn derive_recommendations(report: &mut SecurityReport, output: &OutputConfig) {
    if !output.include_recommendations {
        return;
    }

    let derived: Vec<Recommendation> = [
        dependencies(report),
        environment(report),
        api(report),
        headers(report),
        database(report),
    ]
    .into_iter()
    .flatten()
    .collect();

    report.recommendations.extend(derived);
}

fn dependencies(report: &SecurityReport) -> Option<Recommendation> {
    let count = report.vulnerabilities.len();
    (count > 0).then(|| Recommendation {
        priority: Priority::High,
        category: RecommendationCategory::Dependencies,
        title: "Update vulnerable dependencies".to_string(),
        description: format!(
            "{} vulnerable package(s) found. Run the package manager's audit fix command and upgrade packages with known advisories.",
            count
        ),
    })
}

fn environment(report: &SecurityReport) -> Option<Recommendation> {
    let Some(CheckOutcome::Environment(outcome)) = report.outcome(CheckName::EnvironmentVariables)
    else {
        return None;
    };
    if outcome.missing.is_empty() && outcome.insecure.is_empty() {
        return None;
    }

    Some(Recommendation {
        priority: Priority::High,
        category: RecommendationCategory::Environment,
        title: "Secure environment variables".to_string(),
        description: format!(
            "{} missing and {} insecure environment variable(s). Set every required variable and replace weak or placeholder values with strong secrets.",
            outcome.missing.len(),
            outcome.insecure.len()
        ),
    })
}

fn api(report: &SecurityReport) -> Option<Recommendation> {
    let Some(CheckOutcome::Api(ApiOutcome::Scanned {
        unprotected_endpoints,
        missing_validation,
        ..
    })) = report.outcome(CheckName::ApiSecurity)
    else {
        return None;
    };
    if *unprotected_endpoints == 0 && *missing_validation == 0 {
        return None;
    }

    Some(Recommendation {
        priority: Priority::High,
        category: RecommendationCategory::Api,
        title: "Protect API endpoints".to_string(),
        description: format!(
            "{} endpoint(s) without authentication and {} without input validation. Add auth middleware and schema validation to every route handler.",
            unprotected_endpoints, missing_validation
        ),
    })
}

fn headers(report: &SecurityReport) -> Option<Recommendation> {
    let description = match report.outcome(CheckName::SecurityHeaders)? {
        CheckOutcome::Headers(HeadersOutcome::ConfigMissing { .. }) => {
            "No security headers configuration found. Configure HTTP security headers for all responses.".to_string()
        }
        CheckOutcome::Headers(HeadersOutcome::Scanned { missing, .. }) if !missing.is_empty() => {
            format!("Add the missing security headers: {}.", missing.join(", "))
        }
        _ => return None,
    };

    Some(Recommendation {
        priority: Priority::Medium,
        category: RecommendationCategory::Headers,
        title: "Configure security headers".to_string(),
        description,
    })
}

fn database(report: &SecurityReport) -> Option<Recommendation> {
    let Some(CheckOutcome::Database(DatabaseOutcome::Scanned { issues, .. })) =
        report.outcome(CheckName::DatabaseSecurity)
    else {
        return None;
    };
    if issues.is_empty() {
        return None;
    }

    Some(Recommendation {
        priority: Priority::Medium,
        category: RecommendationCategory::Database,
        title: "Harden database configuration".to_string(),
        description: format!("{}.", issues.join("; ")),
    })
}
