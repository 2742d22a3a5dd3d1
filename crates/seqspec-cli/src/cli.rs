//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Seqspec CLI - sequence-diagram to OpenAPI conversion and validation
///
/// Converts a textual sequence-diagram notation describing HTTP interactions
/// into one OpenAPI 3.0 document per target service, and validates both the
/// notation and the generated or supplied documents.
#[derive(Parser, Debug)]
#[command(
    name = "seqspec",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Output format for results
    #[arg(short, long, value_enum, global = true, default_value = "human")]
    pub output: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one OpenAPI document per target service from a diagram
    Generate(GenerateArgs),

    /// Validate diagram syntax, optionally checking the generated documents
    Validate(ValidateArgs),

    /// Validate externally supplied OpenAPI JSON documents
    Check(CheckArgs),
}

/// Arguments for the generate command
#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Path to the sequence-diagram file
    #[arg(value_name = "DIAGRAM")]
    pub diagram: PathBuf,

    /// Write one file per service into this directory instead of stdout
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Arguments for the validate command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to the sequence-diagram file
    #[arg(value_name = "DIAGRAM")]
    pub diagram: PathBuf,

    /// Also generate documents and run the document validator over them
    #[arg(long)]
    pub specs: bool,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// OpenAPI JSON files; multiple files validate as a named map
    #[arg(value_name = "OPENAPI_JSON", required = true)]
    pub documents: Vec<PathBuf>,
}

/// Output format for results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output with colors
    Human,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// YAML
    Yaml,
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Whether colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color
    }

    /// Effective verbosity level (0 when quiet)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
