//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use geofeat_core::config::{CliConfigOverrides, LayeredConfig};
use geofeat_core::models::{AxisOrder, ValidityMode};

use crate::cli::Cli;

/// Load layered configuration from an optional file and the environment
pub fn load_config(config_path: Option<&std::path::Path>) -> Result<LayeredConfig> {
    let config = match config_path {
        Some(path) => LayeredConfig::with_defaults()
            .load_from_file(path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => LayeredConfig::with_defaults(),
    };

    Ok(config.load_from_env())
}

/// Overrides carried by the global flags; unset flags leave lower layers alone
pub fn global_overrides(cli: &Cli) -> CliConfigOverrides {
    CliConfigOverrides {
        wkt_validity: cli.strict.then_some(ValidityMode::Strict),
        legacy_markers: cli.legacy_markers.then_some(true),
        axis_order: cli.lat_lng.then_some(AxisOrder::LatLng),
        km_per_degree: None,
    }
}

/// Load layered configuration with CLI overrides
pub fn load_config_with_overrides(
    config_path: Option<&std::path::Path>,
    overrides: CliConfigOverrides,
) -> Result<LayeredConfig> {
    let mut config = load_config(config_path)?;
    config.update_from_cli(overrides);
    Ok(config)
}
