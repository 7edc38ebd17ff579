//! Geofeat Geo - WKT/GeoJSON codec and proximity planning
//!
//! This crate converts geometries between Well-Known Text and GeoJSON
//! features, swaps coordinate axis order for lat/lng clients, and builds
//! bounded great-circle proximity queries around a point.

pub mod axes;
pub mod codec;
pub mod feature;
pub mod models;
pub mod proximity;
pub mod record;
pub mod wkt;

pub use axes::{reverse_coordinate_axes, reverse_object_axes};
pub use codec::GeometryCodec;
pub use feature::{feature_to_geometry, geometry_to_feature, geometry_to_feature_with};
pub use models::GeometryExt;
pub use proximity::{ProximityOrigin, ProximityPlan, ProximityPlanner};
pub use record::{is_spatial_column, SpatialAttributes};
