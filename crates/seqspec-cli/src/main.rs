//! Seqspec CLI - sequence-diagram to OpenAPI conversion and validation
//!
//! This is the main entry point for the Seqspec CLI application, providing
//! commands for generating OpenAPI documents from diagram files and for
//! validating diagrams and documents.

mod cli;
mod error;
mod handlers;
mod logging;
mod output;

use cli::{Cli, Commands};
use colored::control;
use error::Result;
use output::OutputWriter;
use std::process;

fn main() {
    // Parse command-line arguments
    let cli = Cli::parse_args();

    // Set up colored output
    control::set_override(cli.use_color());

    // Initialize logging
    if let Err(message) = logging::init(cli.verbosity_level()) {
        eprintln!("Failed to initialize logging: {message}");
    }

    // Run the application
    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!(
                "{}",
                error::format_error(&err, control::SHOULD_COLORIZE.should_colorize())
            );
            process::exit(err.exit_code());
        }
    }
}

/// Main application logic; returns the process exit code
fn run(cli: Cli) -> Result<i32> {
    let mut output = OutputWriter::new(cli.output, cli.use_color(), cli.quiet);

    tracing::info!(command = ?cli.command, "executing command");

    match cli.command {
        Commands::Generate(args) => handlers::handle_generate(args, &mut output),
        Commands::Validate(args) => handlers::handle_validate(args, &mut output),
        Commands::Check(args) => handlers::handle_check(args, &mut output),
    }
}
