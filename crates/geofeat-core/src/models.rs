pub mod feature;
pub mod geometry;
pub mod options;

pub use feature::{type_tag, Feature, FeatureCollection, GeoJsonObject, Properties};
pub use geometry::{Geometry, GeometryType, Position};
pub use options::{AxisOrder, CodecOptions, ValidityMode, KM_PER_DEGREE};
