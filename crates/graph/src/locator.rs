//! Depfile discovery.

use crate::{BuildDir, Error, Result};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Find every depfile belonging to `base`, one per build variant.
///
/// Paths come back in the order the glob yields them. A base name without
/// any depfile is a leaf: a warning is logged and an empty list returned.
///
/// # Errors
///
/// Returns [`Error::Pattern`] if the search pattern is invalid and
/// [`Error::Glob`] if a directory entry cannot be read.
pub fn locate(build_dir: &BuildDir, base: &str) -> Result<Vec<PathBuf>> {
    let pattern = build_dir.depfile_pattern(base);
    let entries = glob::glob(&pattern).map_err(|source| Error::Pattern {
        pattern: pattern.clone(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }

    if files.is_empty() {
        warn!(base, "did not find any file named {pattern}");
    } else {
        debug!(base, count = files.len(), "located depfiles");
    }

    Ok(files)
}
