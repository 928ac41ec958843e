use crate::config::PatternMatching;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Decides which file names are picked up by [`discover_files`].
#[derive(Debug, Clone)]
pub enum FileMatcher {
    Exact(Vec<String>),
    Glob(Vec<glob::Pattern>),
}

impl FileMatcher {
    pub fn new(patterns: &[String], matching: PatternMatching) -> Result<Self> {
        match matching {
            PatternMatching::Exact => Ok(FileMatcher::Exact(patterns.to_vec())),
            PatternMatching::Glob => patterns
                .iter()
                .map(|p| {
                    glob::Pattern::new(p).with_context(|| format!("Invalid file pattern '{}'", p))
                })
                .collect::<Result<Vec<_>>>()
                .map(FileMatcher::Glob),
        }
    }

    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            FileMatcher::Exact(names) => names.iter().any(|n| n == file_name),
            FileMatcher::Glob(patterns) => patterns.iter().any(|p| p.matches(file_name)),
        }
    }
}

/// True when the pattern would mean something different as a glob than as a file name.
pub fn looks_like_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Depth-first walk of `root`, returning every file whose name the matcher accepts.
///
/// Entries are visited in the order the filesystem lists them. Symlinked
/// directories are not followed.
pub fn discover_files(root: &Path, matcher: &FileMatcher) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();
    walk(root, matcher, &mut results)?;
    Ok(results)
}

fn walk(dir: &Path, matcher: &FileMatcher, results: &mut Vec<PathBuf>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory '{}'", dir.display()))?;

    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            walk(&path, matcher, results)?;
            continue;
        }

        let is_file = file_type.is_file() || (file_type.is_symlink() && path.is_file());
        if is_file && matcher.matches(&entry.file_name().to_string_lossy()) {
            results.push(path);
        }
    }

    Ok(())
}
