use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;

const ALL_DISABLED: &str = r#"{
  "project": { "name": "storefront" },
  "checks": {
    "dependencyAudit": { "enabled": false },
    "environmentVariables": { "enabled": false },
    "securityHeaders": { "enabled": false },
    "apiSecurity": { "enabled": false },
    "databaseSecurity": { "enabled": false }
  }
}"#;

fn cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("security-monitor").unwrap();
    cmd.current_dir(dir).env_remove("RUST_LOG");
    cmd
}

fn read_report(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn missing_config_exits_with_error() {
    let tmp = tempfile::tempdir().unwrap();
    cmd(tmp.path())
        .arg("does-not-exist.json")
        .assert()
        .code(1)
        .stderr(contains("failed to read config file"));
    assert!(!tmp.path().join("security-report.json").exists());
}

#[test]
fn malformed_config_exits_with_error() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("broken.json"), "{ \"checks\": ").unwrap();
    cmd(tmp.path())
        .arg("broken.json")
        .assert()
        .code(1)
        .stderr(contains("invalid config file"));
    assert!(!tmp.path().join("security-report.json").exists());
}

#[test]
fn config_without_checks_exits_with_error() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("cfg.json"), r#"{"project": {"name": "x"}}"#).unwrap();
    cmd(tmp.path())
        .arg("cfg.json")
        .assert()
        .code(1)
        .stderr(contains("no \"checks\" section"));
}

#[test]
fn all_disabled_run_succeeds_and_writes_report() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("security-monitor.config.json"), ALL_DISABLED).unwrap();

    cmd(tmp.path())
        .assert()
        .success()
        .stdout(contains("Report saved to"));

    let report = read_report(&tmp.path().join("security-report.json"));
    assert!(report["checks"].as_object().unwrap().is_empty());
    assert!(report["recommendations"].as_array().unwrap().is_empty());
    assert_eq!(report["project"]["name"], "storefront");
}

#[test]
fn warnings_do_not_change_exit_code() {
    let tmp = tempfile::tempdir().unwrap();
    let config = r#"{
      "checks": {
        "securityHeaders": { "enabled": true },
        "apiSecurity": { "enabled": true }
      },
      "output": { "reportFile": "reports/audit.json" }
    }"#;
    fs::write(tmp.path().join("monitor.json"), config).unwrap();

    cmd(tmp.path())
        .arg("monitor.json")
        .assert()
        .success()
        .stdout(contains("Security headers"));

    let report = read_report(&tmp.path().join("reports/audit.json"));
    assert_eq!(report["checks"]["securityHeaders"]["status"], "warn");
    assert_eq!(report["checks"]["securityHeaders"]["missing"], "config_file");
    assert_eq!(report["checks"]["apiSecurity"]["missing"], "api_directory");
    assert_eq!(report["warnings"].as_array().unwrap().len(), 2);
    assert_eq!(report["recommendations"].as_array().unwrap().len(), 1);
}
