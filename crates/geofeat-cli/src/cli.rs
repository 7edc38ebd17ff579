use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Geofeat - WKT/GeoJSON conversion and proximity planning
#[derive(Parser, Debug)]
#[command(name = "geofeat")]
#[command(about = "WKT/GeoJSON conversion and proximity planning", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Reject malformed WKT instead of emptying the offending part
    #[arg(long, global = true)]
    pub strict: bool,

    /// Emit "<TYPE> not implemented" for unknown geometry types instead of failing
    #[arg(long, global = true)]
    pub legacy_markers: bool,

    /// GeoJSON coordinates are [lat, lng] on input and output
    #[arg(long, global = true)]
    pub lat_lng: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode WKT into a GeoJSON Feature or FeatureCollection
    Decode(DecodeArgs),

    /// Encode GeoJSON as WKT
    Encode(EncodeArgs),

    /// Swap the coordinate axes of a GeoJSON document
    Reverse(ReverseArgs),

    /// Plan a proximity search around a point
    Near(NearArgs),

    /// Show effective configuration and where each value came from
    Config,
}

#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// WKT text, or "-" to read from stdin
    pub wkt: String,

    /// Properties for every synthesized feature, as a JSON object
    #[arg(long, value_name = "JSON")]
    pub properties: Option<String>,
}

#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// GeoJSON geometry, Feature or FeatureCollection, or "-" to read from stdin
    pub geojson: String,
}

#[derive(Parser, Debug)]
pub struct ReverseArgs {
    /// GeoJSON document, or "-" to read from stdin
    pub geojson: String,
}

#[derive(Parser, Debug)]
#[command(allow_negative_numbers = true)]
pub struct NearArgs {
    /// Longitude of the search origin
    pub lng: f64,

    /// Latitude of the search origin
    pub lat: f64,

    /// Search radius in kilometers
    #[arg(long, short = 'r')]
    pub radius: f64,

    /// Spatial attribute the plan filters on
    #[arg(long, default_value = "location")]
    pub attribute: String,

    /// Length of one degree of latitude in kilometers
    #[arg(long)]
    pub km_per_degree: Option<f64>,

    /// GeoJSON FeatureCollection file to rank against the plan
    #[arg(long, value_name = "PATH")]
    pub candidates: Option<PathBuf>,
}
