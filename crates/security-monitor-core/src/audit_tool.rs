use crate::report::{Vulnerability, VulnerabilitySeverity};
use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Stdio};

/// Runs the external dependency-audit tool and returns its standard output.
pub trait AuditRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> anyhow::Result<String>;
}

/// Spawns the audit tool as a blocking child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessAuditRunner;

impl AuditRunner for ProcessAuditRunner {
    fn run(&self, program: &str, args: &[String], cwd: &Path) -> anyhow::Result<String> {
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("Failed to spawn '{}'", program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "'{} {}' exited with {}: {}",
                program,
                args.join(" "),
                output.status,
                stderr.trim()
            );
        }

        String::from_utf8(output.stdout)
            .with_context(|| format!("'{}' returned non-UTF8 output", program))
    }
}

/// Split the configured command into program and arguments.
pub fn command_line(package_manager: &str, command: &str) -> (String, Vec<String>) {
    let args = command.split_whitespace().map(str::to_string).collect();
    (package_manager.to_string(), args)
}

#[derive(Debug, Deserialize)]
struct AuditEnvelope {
    #[serde(default)]
    vulnerabilities: BTreeMap<String, AuditAdvisory>,
}

#[derive(Debug, Deserialize)]
struct AuditAdvisory {
    #[serde(default)]
    severity: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    recommendation: Option<String>,
}

/// Parse the audit tool's JSON output into vulnerability records, ordered by package name.
pub fn parse_audit_output(stdout: &str) -> anyhow::Result<Vec<Vulnerability>> {
    let envelope: AuditEnvelope =
        serde_json::from_str(stdout.trim()).context("Audit tool returned invalid JSON output")?;

    Ok(envelope
        .vulnerabilities
        .into_iter()
        .map(|(package, advisory)| Vulnerability {
            severity: VulnerabilitySeverity::parse(&advisory.severity),
            title: advisory
                .title
                .unwrap_or_else(|| format!("Vulnerability in {}", package)),
            description: advisory.description.unwrap_or_default(),
            remediation: advisory
                .recommendation
                .unwrap_or_else(|| format!("Update {} to a patched version", package)),
            package,
        })
        .collect())
}
