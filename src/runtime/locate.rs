use crate::error::{LaunchError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Find the single directory under `parent` whose name starts with `prefix`.
///
/// The versioned segment of the runtime path is unknown at build time, so the
/// search is pattern-based: `prefix` plus any suffix. Zero matches is fatal
/// and the error names the searched pattern. When several versions are
/// present the lexicographically greatest name wins; this is a deliberate
/// tie-break policy, not an artifact of directory enumeration order.
pub fn locate_versioned_dir(parent: &Path, prefix: &str) -> Result<PathBuf> {
    let pattern = format!("{}*", parent.join(prefix).display());

    let mut matches: Vec<PathBuf> = Vec::new();
    if let Ok(entries) = fs::read_dir(parent) {
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(prefix) && entry.path().is_dir() {
                log::debug!("Candidate runtime directory: {name}");
                matches.push(entry.path());
            }
        }
    }

    if matches.is_empty() {
        return Err(LaunchError::RuntimeNotFound { pattern });
    }

    if matches.len() > 1 {
        matches.sort();
        log::debug!(
            "Multiple runtime directories matched {pattern}, selecting {}",
            matches[matches.len() - 1].display()
        );
    }

    Ok(matches.pop().expect("matches is non-empty"))
}
