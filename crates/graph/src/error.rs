//! Error types for closure computation.

use std::path::PathBuf;

/// Result type for closure operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while locating, reading or walking depfiles.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The build directory cannot be used to build search patterns.
    #[error("Invalid build directory '{path}': {reason}")]
    InvalidBuildDir {
        /// The build directory as given.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// The base name cannot name a build unit.
    #[error("Invalid base name '{name}': {reason}")]
    InvalidBaseName {
        /// The rejected base name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The depfile search pattern did not compile.
    #[error("Invalid depfile pattern '{pattern}': {source}")]
    Pattern {
        /// The glob pattern that failed.
        pattern: String,
        /// Underlying glob error.
        #[source]
        source: glob::PatternError,
    },

    /// A directory entry could not be read while searching for depfiles.
    #[error("Failed to search for depfiles: {0}")]
    Glob(#[from] glob::GlobError),

    /// The rule anchor regex did not compile.
    #[error("Invalid rule anchor for '{base}': {source}")]
    Anchor {
        /// The base name the anchor was built for.
        base: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// A depfile found by the locator could not be read.
    #[error("Failed to read depfile '{}': {source}", path.display())]
    Read {
        /// The depfile path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Create an invalid base name error.
    #[must_use]
    pub fn invalid_base_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Whether the error comes from the caller's input rather than the filesystem.
    #[must_use]
    pub const fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::InvalidBuildDir { .. } | Self::InvalidBaseName { .. }
        )
    }
}
