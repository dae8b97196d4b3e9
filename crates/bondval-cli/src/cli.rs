//! CLI argument definitions.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::commands::{DefaultsArgs, FunctionsArgs, PlanArgs};

/// Bondval - Bond value-query resolution CLI
#[derive(Parser)]
#[command(name = "bondval")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (.toml or .json). Defaults to the built-in table.
    #[arg(short, long, global = true, env = "BONDVAL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Plan how values would be resolved for bonds, without pricing
    Plan(PlanArgs),

    /// Show the default curves injected per currency
    Defaults(DefaultsArgs),

    /// List the registered computation functions
    Functions(FunctionsArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// Minimal output (one identifier per line)
    Minimal,
}
