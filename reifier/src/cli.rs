//! Command-line interface definitions for reifier.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Reifier - reified type-parameter Kotlin extensions for Gradle API jars
#[derive(Parser, Debug)]
#[command(name = "reifier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to reifier.toml configuration file
    #[arg(short, long, global = true, env = "REIFIER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv, -vvv for increasing verbosity)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Scan jars and write the Kotlin extensions file
    Generate(GenerateArgs),

    /// Print the extensions that would be generated
    List(ListArgs),

    /// Initialize a new reifier.toml configuration file
    Init(InitArgs),

    /// Display the effective configuration
    Info,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Jars to scan (replaces the configured classpath)
    pub jars: Vec<PathBuf>,

    /// Output file path (overrides config file)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Jars to scan (replaces the configured classpath)
    pub jars: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: ListFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Kotlin declarations, as written to the output file
    Pretty,
    /// Extension descriptors as JSON
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct InitArgs {
    /// Overwrite an existing reifier.toml
    #[arg(long)]
    pub force: bool,
}
