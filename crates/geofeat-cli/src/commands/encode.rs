//! Encode command implementation

use super::{cli_error, parse_json, read_input};
use crate::cli::EncodeArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use geofeat_core::config::LayeredConfig;
use geofeat_geo::GeometryCodec;
use serde_json::Value;

pub fn execute(args: EncodeArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let text = read_input(&args.geojson)?;
    let value = parse_json(&text, "encode")?;
    let codec = GeometryCodec::from_config(config);

    let wkt = match value.get("type").and_then(Value::as_str) {
        Some("Feature") | Some("FeatureCollection") => codec.geojson_to_wkt(&text),
        // Bare geometries go through the value encoder so legacy markers apply
        _ => {
            let value = if codec.axis_order().needs_reversal() {
                codec.reverse_coordinate_axes(value)
            } else {
                value
            };
            codec.encode_wkt_value(&value)
        }
    }
    .map_err(cli_error("encode"))?;

    output.text(&wkt)
}
