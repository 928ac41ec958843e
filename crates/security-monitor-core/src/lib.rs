pub mod audit_tool;
pub mod checks;
pub mod config;
pub mod context;
pub mod discovery;
pub mod orchestrator;
pub mod recommendations;
pub mod report;

pub use checks::{CheckName, SecurityCheck};
pub use config::{ConfigError, MonitorConfig, DEFAULT_CONFIG_FILE};
pub use context::RunContext;
pub use orchestrator::Auditor;
pub use report::{CheckOutcome, CheckStatus, SecurityReport};
