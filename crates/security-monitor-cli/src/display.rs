use colored::*;
use security_monitor_core::report::{Priority, Recommendation};
use security_monitor_core::{CheckName, CheckStatus, SecurityReport};
use std::path::Path;

/// Print the end-of-run summary to the terminal.
pub fn print_summary(report: &SecurityReport, report_path: &Path) {
    println!();
    let title = if report.project.name.is_empty() {
        format!(" Security Monitor v{}", env!("CARGO_PKG_VERSION"))
    } else {
        format!(
            " Security Monitor v{} — {}",
            env!("CARGO_PKG_VERSION"),
            report.project.name
        )
    };
    println!("{}", title.bold());
    println!(" {}", "=".repeat(60).dimmed());
    println!();

    println!(" {}", "Checks".bold().underline());
    for name in CheckName::ALL {
        let badge = match report.status(name) {
            Some(status) => status_badge(status),
            None => " SKIP ".dimmed().to_string(),
        };
        println!(" {} {} {}", "|-".dimmed(), badge, name.label());
    }
    println!();

    println!(" {}", "Summary".bold().underline());
    let vulnerabilities = report.vulnerabilities.len();
    println!(
        " {} Vulnerabilities:  {}",
        "|-".dimmed(),
        if vulnerabilities > 0 {
            vulnerabilities.to_string().red().bold().to_string()
        } else {
            "0".to_string()
        }
    );
    println!(" {} Warnings:         {}", "|-".dimmed(), report.warnings.len());
    println!(
        " {} Recommendations:  {}",
        "|-".dimmed(),
        report.recommendations.len()
    );
    println!(
        " {} Checks: {} passed, {} warned, {} failed, {} errored",
        "|-".dimmed(),
        report.status_count(CheckStatus::Pass),
        report.status_count(CheckStatus::Warn),
        report.status_count(CheckStatus::Fail),
        report.status_count(CheckStatus::Error),
    );
    println!();

    if !report.warnings.is_empty() {
        println!(" {}", "Warnings".bold().underline());
        for warning in &report.warnings {
            println!(" {} {}", "|-".dimmed(), warning.yellow());
        }
        println!();
    }

    if !report.recommendations.is_empty() {
        println!(" {}", "Recommendations".bold().underline());
        for recommendation in &report.recommendations {
            print_recommendation(recommendation);
        }
        println!();
    }

    println!(" Report saved to {}", report_path.display().to_string().cyan());
    println!();
}

fn status_badge(status: CheckStatus) -> String {
    let tag = format!(" {} ", status.symbol());
    match status {
        CheckStatus::Pass => tag.on_green().black().bold().to_string(),
        CheckStatus::Warn => tag.on_yellow().black().bold().to_string(),
        CheckStatus::Fail => tag.on_red().white().bold().to_string(),
        CheckStatus::Error => tag.on_magenta().white().bold().to_string(),
    }
}

fn print_recommendation(recommendation: &Recommendation) {
    let tag = format!("[{}]", recommendation.priority.symbol());
    let tag = match recommendation.priority {
        Priority::High => tag.red().bold(),
        Priority::Medium => tag.yellow().bold(),
    };
    println!(" {} {} {}", "|-".dimmed(), tag, recommendation.title.bold());
    println!("    {} {}", "|".dimmed(), recommendation.description.dimmed());
}
