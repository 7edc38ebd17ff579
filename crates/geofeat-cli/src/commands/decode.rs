//! Decode command implementation

use super::{cli_error, parse_json, read_input};
use crate::cli::DecodeArgs;
use crate::errors::CliError;
use crate::output::OutputWriter;
use anyhow::Result;
use geofeat_core::config::LayeredConfig;
use geofeat_core::models::Properties;
use geofeat_geo::GeometryCodec;
use serde_json::Value;

pub fn execute(args: DecodeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let wkt = read_input(&args.wkt)?;
    let properties = match args.properties.as_deref() {
        Some(text) => match parse_json(text, "decode")? {
            Value::Object(map) => map,
            other => {
                return Err(CliError::new("--properties must be a JSON object")
                    .with_context(format!("Got: {}", other))
                    .with_suggestion("Pass an object such as '{\"id\": 7}'")
                    .into())
            }
        },
        None => Properties::new(),
    };

    let codec = GeometryCodec::from_config(config);
    let feature = codec.wkt_to_feature(wkt.trim(), &properties).map_err(cli_error("decode"))?;
    tracing::debug!(kind = feature.type_name(), "Decoded WKT");

    output.result(feature)
}
