//! Bondval CLI - resolution planning and configuration inspection.
//!
//! # Usage
//!
//! ```bash
//! # Plan the clean price of every bond in a file
//! bondval plan --bonds bonds.csv --curves curves.json --quotes quotes.csv
//!
//! # Ask for a Z-spread against explicit curves
//! bondval plan --bonds bonds.csv --curves curves.json --quotes quotes.csv \
//!     --value "Z Spread" -p RiskFreeCurve=SOFR -p RiskFreeCurveCalculationConfig=SofrCfg
//!
//! # Show the default curve table
//! bondval defaults --currency USD
//!
//! # List the functions that can produce a value
//! bondval functions --value "Dirty Price"
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Set up output format and configuration
    let format = cli.format;
    let config = commands::load_config(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Plan(args) => commands::plan::execute(args, format, &config, cli.quiet)?,
        Commands::Defaults(args) => commands::defaults::execute(args, format, &config)?,
        Commands::Functions(args) => commands::functions::execute(args, format)?,
    }

    Ok(())
}

/// Logs go to stderr so they never mix with table, JSON or CSV output.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn,bondval=info",
        1 => "warn,bondval=debug",
        _ => "info,bondval=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
