use crate::logging::{LogLevel, TracingFormat};
use clap::{Parser, ValueEnum};
use miette::{Diagnostic, Report};
use okclosure_graph::ExtractMode;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Depfile access or other fatal error exit code
pub const EXIT_FATAL: i32 = 1;
/// Usage error exit code, matching clap's own argument errors
pub const EXIT_USAGE: i32 = 2;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// Invalid invocation (exit code 2)
    #[error("Usage error: {message}")]
    #[diagnostic(code(okclosure::cli::usage))]
    Usage {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Depfile access or rendering failure (exit code 1)
    #[error("Fatal error: {message}")]
    #[diagnostic(code(okclosure::cli::fatal))]
    Fatal {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new usage error
    #[must_use]
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new fatal error
    #[must_use]
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
            help: None,
        }
    }

    /// Add help text to an existing error, returning a new error with the help text set.
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Usage { message, .. } => Self::Usage { message, help },
            Self::Fatal { message, .. } => Self::Fatal { message, help },
        }
    }
}

/// Convert `okclosure_graph::Error` to the matching `CliError` variant.
///
/// Bad build directories and base names are usage errors; everything the
/// filesystem throws at the walk is fatal.
impl From<okclosure_graph::Error> for CliError {
    fn from(err: okclosure_graph::Error) -> Self {
        match &err {
            okclosure_graph::Error::InvalidBaseName { .. } => Self::usage(err.to_string())
                .with_help("Pass the stem of the source file, e.g. `main` for main.cpp"),
            _ if err.is_usage() => Self::usage(err.to_string()),
            okclosure_graph::Error::Read { .. } => Self::fatal(err.to_string())
                .with_help("Depfiles are produced by the compile step; rebuild to regenerate them"),
            _ => Self::fatal(err.to_string()),
        }
    }
}

/// Get exit code for a CLI error
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Usage { .. } => EXIT_USAGE,
        CliError::Fatal { .. } => EXIT_FATAL,
    }
}

/// Render error to stderr using miette
pub fn render_error(err: &CliError) {
    let report = Report::new(err.clone());
    #[allow(clippy::print_stderr)]
    {
        eprintln!("{report:?}");
    }
    // Ensure output is flushed before potential process exit
    let _ = io::stderr().flush();
}

/// How prerequisites are read from depfiles
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, ValueEnum)]
pub enum Mode {
    /// First prerequisite of each `<base>.ok: ...` rule occurrence
    #[default]
    Anchored,
    /// Every `.ok` prerequisite of rules targeting `<base>.ok`
    Rule,
}

impl From<Mode> for ExtractMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Anchored => Self::Anchored,
            Mode::Rule => Self::Rule,
        }
    }
}

/// Output format for the closure
#[derive(Copy, Clone, Debug, Eq, PartialEq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Space-separated marker paths on one line
    #[default]
    Text,
    /// JSON object with the build directory, start node and markers
    Json,
    /// Graphviz digraph of the discovered dependencies
    Dot,
}

/// List the `.ok` completion markers a build unit transitively depends on.
///
/// Reads `<BUILD_DIR>/<BASE_NAME>.*.d` depfiles, follows every referenced
/// marker, and prints `<BUILD_DIR>/<name>.ok` for each unit reached.
#[derive(Parser, Debug)]
#[command(name = "okclosure")]
#[command(about = "List the .ok completion markers a build unit transitively depends on")]
#[command(version)]
pub struct Cli {
    /// Build directory holding depfiles and markers (e.g. `_build/exe`).
    #[arg(value_name = "BUILD_DIR")]
    pub build_dir: PathBuf,

    /// Base name of the starting unit, without directory or extension.
    #[arg(value_name = "BASE_NAME")]
    pub base_name: String,

    /// Prerequisite extraction strategy.
    #[arg(long, value_enum, default_value_t = Mode::Anchored, env = "OKCLOSURE_MODE")]
    pub mode: Mode,

    /// Output format.
    #[arg(
        long = "format",
        short = 'f',
        value_enum,
        default_value_t = OutputFormat::Text
    )]
    pub format: OutputFormat,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum,
        env = "OKCLOSURE_LOG_LEVEL"
    )]
    pub level: LogLevel,

    /// Diagnostic output format on stderr.
    #[arg(long = "log-format", value_enum, default_value = "compact")]
    pub log_format: TracingFormat,
}

/// Parse command line arguments, exiting with status 2 on usage errors
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
