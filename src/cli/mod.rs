//! CLI module for the bridgejs translator
//!
//! ## Commands
//!
//! - `translate <PROGRAM.json>` - Run the whole pipeline and write the outputs
//! - `emit <PROGRAM.json>` - Print every output file without touching the disk
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }

    /// Render a diagnostic with its code, help and related faults.
    pub fn diagnostic(err: impl miette::Diagnostic + Send + Sync + 'static) -> Self {
        Self::failure(format!("{:?}", miette::Report::new(err)))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Translate a resolved program into JavaScript
#[derive(Parser, Debug)]
#[command(name = "bridgejs")]
#[command(version = VERSION)]
#[command(about = "Translate a resolved program into JavaScript", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the whole pipeline: hooks, emission, partitioning and writing
    Translate {
        /// Resolved program, serialised as JSON
        #[arg(value_name = "PROGRAM")]
        program: PathBuf,
        /// Configuration file (default: ./bridge.json)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
        /// Output directory, overriding the configured one
        #[arg(long = "out", value_name = "DIR")]
        out: Option<PathBuf>,
        /// Print the combined JavaScript instead of writing files
        #[arg(long, conflicts_with = "out")]
        print: bool,
    },

    /// Print every output file without writing or running hooks
    Emit {
        /// Resolved program, serialised as JSON
        #[arg(value_name = "PROGRAM")]
        program: PathBuf,
        /// Configuration file (default: ./bridge.json)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Translate {
            program,
            config,
            out,
            print,
        } => {
            let project = commands::Project::locate(config.as_deref())?;
            if print {
                commands::print_code(&project, &program)
            } else {
                commands::translate(&project, &program, out.as_deref())
            }
        }
        Command::Emit { program, config } => {
            let project = commands::Project::locate(config.as_deref())?;
            commands::emit(&project, &program)
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
