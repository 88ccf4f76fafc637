//! okclosure CLI Application
//!
//! Invoked by the build as `okclosure <BUILD_DIR> <BASE_NAME>`; the single
//! stdout line lists the markers to link for that unit.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use okclosure::cli::{self, EXIT_OK, exit_code_for, render_error};
use okclosure::logging::{self, TracingConfig};
use std::io::{self, Write};

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();

    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..Default::default()
    };
    if let Err(e) = logging::init_tracing(tracing_config) {
        eprintln!("{e:?}");
    }

    let exit_code = match okclosure::run(&cli) {
        Ok(output) => {
            println!("{output}");
            let _ = io::stdout().flush();
            EXIT_OK
        }
        Err(err) => {
            render_error(&err);
            exit_code_for(&err)
        }
    };
    std::process::exit(exit_code);
}
