//! Geofeat CLI - Command-line interface
//!
//! Converts between WKT and GeoJSON and plans proximity searches.

mod cli;
mod commands;
mod config_loader;
mod errors;
mod output;
mod output_types;

use clap::Parser;
use cli::Cli;
use errors::CliError;
use output::OutputWriter;

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    let output = OutputWriter::new(cli.json);

    // Execute the command
    if let Err(e) = commands::execute(cli, &output) {
        match e.downcast_ref::<CliError>() {
            Some(cli_error) if !output.is_json() => cli_error.display(),
            _ => output.error(format!("{:#}", e)),
        }
        std::process::exit(1);
    }
}
