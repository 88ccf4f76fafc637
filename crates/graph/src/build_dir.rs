//! The build directory and the names derived from it.
//!
//! All depfiles and markers of one build live directly under a single
//! directory. Paths are rendered by plain string concatenation so that they
//! match the text a compiler wrote into the depfiles byte for byte.

use crate::{Error, Result};
use glob::Pattern;
use std::fmt;
use std::path::Path;

/// Suffix of completion marker files.
pub(crate) const MARKER_SUFFIX: &str = ".ok";

/// Suffix of dependency-listing files.
const DEPFILE_SUFFIX: &str = ".d";

/// Read-only build directory a closure is computed against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildDir {
    root: String,
}

impl BuildDir {
    /// Wrap a build directory path exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidBuildDir`] if the path is empty or not valid UTF-8.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let root = path.to_str().ok_or_else(|| Error::InvalidBuildDir {
            path: path.to_path_buf(),
            reason: "path contains invalid UTF-8".to_string(),
        })?;
        if root.is_empty() {
            return Err(Error::InvalidBuildDir {
                path: path.to_path_buf(),
                reason: "path is empty".to_string(),
            });
        }
        Ok(Self {
            root: root.to_string(),
        })
    }

    /// The build directory as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.root
    }

    /// Marker path for a base name: `<buildDir>/<base>.ok`.
    #[must_use]
    pub fn marker_path(&self, base: &str) -> String {
        format!("{}/{base}{MARKER_SUFFIX}", self.root)
    }

    /// Glob matching every depfile of a base name: `<buildDir>/<base>.*.d`.
    ///
    /// Glob metacharacters in the directory and base name match literally.
    #[must_use]
    pub fn depfile_pattern(&self, base: &str) -> String {
        format!(
            "{}/{}.*{DEPFILE_SUFFIX}",
            Pattern::escape(&self.root),
            Pattern::escape(base)
        )
    }

    /// Literal text that opens a rule for `base`'s marker:
    /// `<buildDir>/<base>.ok: <buildDir>/`.
    #[must_use]
    pub fn rule_anchor(&self, base: &str) -> String {
        format!("{}: {}/", self.marker_path(base), self.root)
    }

    /// Prefix every prerequisite marker carries: `<buildDir>/`.
    pub(crate) fn prefix(&self) -> String {
        format!("{}/", self.root)
    }
}

impl fmt::Display for BuildDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)
    }
}

/// Check that a base name can name a build unit.
///
/// Glob and regex metacharacters are accepted and escaped wherever the name
/// is interpolated; only an empty or multi-line name is rejected.
///
/// # Errors
///
/// Returns [`Error::InvalidBaseName`] for an empty name or one containing a
/// line break.
pub fn validate_base_name(base: &str) -> Result<()> {
    if base.is_empty() {
        return Err(Error::invalid_base_name(base, "base name is empty"));
    }
    if base.contains(['\n', '\r']) {
        return Err(Error::invalid_base_name(
            base,
            "base name contains a line break",
        ));
    }
    Ok(())
}
