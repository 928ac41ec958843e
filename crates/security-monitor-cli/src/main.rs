mod display;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use security_monitor_core::{Auditor, DEFAULT_CONFIG_FILE};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "security-monitor",
    version,
    about = "Security Monitor — audit a web project for common security misconfigurations",
    long_about = "Runs the dependency audit, environment variable, security header, API endpoint and database configuration checks enabled in the config file, writes a JSON report and prints a summary.\n\nThe exit code is 0 whenever the run completes, whatever the check outcomes; inspect the report to gate a pipeline."
)]
struct Cli {
    /// Path to the monitor configuration file
    #[arg(default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli.config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(config_path: &Path) -> Result<()> {
    let auditor = Auditor::from_path(config_path)?;
    logging::init(&auditor.config().output.log_level)?;

    let report = auditor.run();

    let report_path = Path::new(&auditor.config().output.report_file);
    report
        .write_to(report_path)
        .with_context(|| format!("Failed to save report to '{}'", report_path.display()))?;

    display::print_summary(&report, report_path);
    Ok(())
}
