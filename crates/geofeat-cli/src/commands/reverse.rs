//! Reverse command implementation

use super::{parse_json, read_input};
use crate::cli::ReverseArgs;
use crate::output::OutputWriter;
use anyhow::Result;
use geofeat_geo::reverse_coordinate_axes;

pub fn execute(args: ReverseArgs, output: &OutputWriter) -> Result<()> {
    let text = read_input(&args.geojson)?;
    let value = parse_json(&text, "reverse")?;
    output.result(reverse_coordinate_axes(value))
}
