//! Depfile discovery and marker closure traversal for okclosure.
//!
//! A build writes one `<base>.<variant>.d` dependency-listing file per unit
//! into its build directory, holding make-style rules between `.ok`
//! completion markers. This crate walks those files from a starting base
//! name and returns every marker the unit transitively depends on.
//!
//! # Key Types
//!
//! - [`BuildDir`]: The build directory a closure is computed against
//! - [`DependencySource`]: Trait that yields the outgoing edges of a base name
//! - [`DepFileSource`]: The filesystem-backed source (locator + extractor)
//! - [`Closure`]: The visited set produced by [`closure`]
//!
//! # Example
//!
//! ```no_run
//! use okclosure_graph::{BuildDir, ExtractMode, compute_markers};
//!
//! let build_dir = BuildDir::new("_build/exe")?;
//! let markers = compute_markers(&build_dir, "main", ExtractMode::Anchored)?;
//! // ["_build/exe/main.ok", "_build/exe/util.ok", "_build/exe/io.ok"]
//! # Ok::<(), okclosure_graph::Error>(())
//! ```

mod build_dir;
mod error;
mod extractor;
mod graph;
mod locator;
mod walker;

pub use build_dir::{BuildDir, validate_base_name};
pub use error::{Error, Result};
pub use extractor::{ExtractMode, Extractor, extract_from_str, extract_targets};
pub use graph::DependencyGraph;
pub use locator::locate;
pub use walker::{Closure, DepFileSource, closure, compute_markers};

/// Source of outgoing edges for the closure walk.
///
/// Implement this trait to feed [`closure`] from something other than
/// depfiles on disk.
pub trait DependencySource {
    /// Returns the base names `base` depends on, in discovery order.
    ///
    /// An unknown base name is a leaf and yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error when the edges cannot be read. The walk aborts on
    /// the first error.
    fn dependencies(&mut self, base: &str) -> Result<Vec<String>>;
}
