//! Rendering of a computed closure for stdout.

use crate::cli::{CliError, OutputFormat};
use okclosure_graph::{BuildDir, Closure};
use serde::Serialize;

/// JSON shape of a closure report.
#[derive(Debug, Serialize)]
pub struct ClosureReport<'a> {
    /// Build directory as given on the command line.
    pub build_dir: &'a str,
    /// Base name the walk started from.
    pub start: &'a str,
    /// Marker paths in visitation order.
    pub markers: Vec<String>,
    /// Whether the discovered dependencies contain a cycle.
    pub cyclic: bool,
}

/// Render `closure` in the requested format, without a trailing newline.
///
/// # Errors
///
/// Returns a fatal error if JSON serialization fails.
pub fn render(
    closure: &Closure,
    build_dir: &BuildDir,
    format: OutputFormat,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Text => Ok(closure.markers(build_dir).join(" ")),
        OutputFormat::Json => {
            let report = ClosureReport {
                build_dir: build_dir.as_str(),
                start: closure.start(),
                markers: closure.markers(build_dir),
                cyclic: closure.graph().has_cycles(),
            };
            serde_json::to_string(&report)
                .map_err(|e| CliError::fatal(format!("Failed to serialize closure: {e}")))
        }
        OutputFormat::Dot => {
            let dot = closure
                .graph()
                .to_dot(|base| build_dir.marker_path(base));
            Ok(dot.trim_end().to_string())
        }
    }
}
