use crate::audit_tool::{AuditRunner, ProcessAuditRunner};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything outside the configuration that a check may read.
pub struct RunContext {
    root: PathBuf,
    env: BTreeMap<String, String>,
    audit_runner: Box<dyn AuditRunner>,
}

impl RunContext {
    /// Context rooted at `root`, with a snapshot of the process environment.
    ///
    /// Variables whose name or value is not valid UTF-8 are left out.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let env = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self {
            root: root.into(),
            env,
            audit_runner: Box::new(ProcessAuditRunner),
        }
    }

    /// Replace the environment snapshot.
    pub fn with_env<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env = vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect();
        self
    }

    pub fn with_audit_runner(mut self, runner: impl AuditRunner + 'static) -> Self {
        self.audit_runner = Box::new(runner);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    pub fn env(&self) -> &BTreeMap<String, String> {
        &self.env
    }

    pub fn audit_runner(&self) -> &dyn AuditRunner {
        self.audit_runner.as_ref()
    }
}
