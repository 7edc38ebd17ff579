//! Command implementations

mod config;
mod decode;
mod encode;
mod near;
mod reverse;

use crate::cli::{Cli, Commands};
use crate::config_loader::{global_overrides, load_config_with_overrides};
use crate::errors::{self, CliError};
use crate::output::OutputWriter;
use anyhow::{Context, Result};
use geofeat_core::error::GeofeatError;
use std::io::Read;

/// Execute a CLI command
pub fn execute(cli: Cli, output: &OutputWriter) -> Result<()> {
    let overrides = global_overrides(&cli);
    let config = load_config_with_overrides(cli.config.as_deref(), overrides)?;
    tracing::debug!(
        wkt_validity = ?config.wkt_validity.value,
        axis_order = ?config.axis_order.value,
        "Loaded configuration"
    );

    match cli.command {
        Commands::Decode(args) => decode::execute(args, &config, output),
        Commands::Encode(args) => encode::execute(args, &config, output),
        Commands::Reverse(args) => reverse::execute(args, output),
        Commands::Near(args) => near::execute(args, config, output),
        Commands::Config => config::execute(&config, output),
    }
}

/// Read a positional argument, or all of stdin when it is "-"
fn read_input(arg: &str) -> Result<String> {
    if arg != "-" {
        return Ok(arg.to_string());
    }
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read input from stdin")?;
    Ok(buffer)
}

/// Parse JSON input, reporting syntax errors with suggestions
fn parse_json(text: &str, command: &str) -> Result<serde_json::Value> {
    serde_json::from_str(text).map_err(|e| errors::input_not_json(&e.to_string(), command).into())
}

/// Attach CLI suggestions to a library error
fn cli_error(command: &'static str) -> impl Fn(GeofeatError) -> CliError {
    move |e| errors::from_geofeat(e, command)
}
