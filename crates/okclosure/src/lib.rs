//! okclosure: print the `.ok` completion markers a build unit depends on.
//!
//! The binary is a thin wrapper over [`run`]; the walk itself lives in
//! [`okclosure_graph`].

/// Command line parsing, CLI errors and exit codes.
pub mod cli;
pub mod logging;
pub mod output;

use cli::{Cli, CliError};
use okclosure_graph::{BuildDir, DepFileSource, closure};
use tracing::{info, instrument};

/// Compute the closure described by `cli` and render it for stdout.
///
/// # Errors
///
/// Returns a usage error for an unusable build directory or base name and
/// a fatal error if a depfile cannot be read.
#[instrument(skip(cli), fields(build_dir = %cli.build_dir.display(), base = %cli.base_name))]
pub fn run(cli: &Cli) -> Result<String, CliError> {
    let build_dir = BuildDir::new(&cli.build_dir)?;
    let mut source = DepFileSource::new(&build_dir, cli.mode.into());
    let closure = closure(&mut source, &cli.base_name)?;
    info!(
        markers = closure.len(),
        edges = closure.graph().edge_count(),
        "computed closure"
    );
    output::render(&closure, &build_dir, cli.format)
}
