//! Canonical geometry types shared by the codec and the planner.
//!
//! The serde representation is GeoJSON: an internally tagged `type` member
//! with `coordinates` (or `geometries` for collections). Positions are always
//! `[longitude, latitude]`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{GeofeatError, Result};

/// A `[longitude, latitude]` pair
pub type Position = [f64; 2];

/// Geometry type classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
}

impl GeometryType {
    pub const ALL: [GeometryType; 7] = [
        GeometryType::Point,
        GeometryType::LineString,
        GeometryType::Polygon,
        GeometryType::MultiPoint,
        GeometryType::MultiLineString,
        GeometryType::MultiPolygon,
        GeometryType::GeometryCollection,
    ];

    /// GeoJSON `type` tag
    pub fn as_str(&self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
            GeometryType::GeometryCollection => "GeometryCollection",
        }
    }

    /// Uppercase WKT keyword
    pub fn wkt_keyword(&self) -> &'static str {
        match self {
            GeometryType::Point => "POINT",
            GeometryType::LineString => "LINESTRING",
            GeometryType::Polygon => "POLYGON",
            GeometryType::MultiPoint => "MULTIPOINT",
            GeometryType::MultiLineString => "MULTILINESTRING",
            GeometryType::MultiPolygon => "MULTIPOLYGON",
            GeometryType::GeometryCollection => "GEOMETRYCOLLECTION",
        }
    }

    /// Match a WKT keyword, ignoring case
    pub fn from_wkt_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.wkt_keyword().eq_ignore_ascii_case(keyword))
    }

    /// Match a GeoJSON `type` tag (case-sensitive, as GeoJSON requires)
    pub fn from_geojson_type(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    /// Array nesting below the `coordinates` member, counting a pair as depth 0.
    /// `None` for collections, which hold geometries instead.
    pub fn coordinate_depth(&self) -> Option<usize> {
        match self {
            GeometryType::Point => Some(0),
            GeometryType::LineString | GeometryType::MultiPoint => Some(1),
            GeometryType::Polygon | GeometryType::MultiLineString => Some(2),
            GeometryType::MultiPolygon => Some(3),
            GeometryType::GeometryCollection => None,
        }
    }
}

impl fmt::Display for GeometryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GeoJSON-compatible geometry representation
///
/// Every variant may be empty. An empty point serializes as `"coordinates": []`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        #[serde(with = "point_coordinates")]
        coordinates: Option<Position>,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    /// Create a Point geometry
    pub fn point(x: f64, y: f64) -> Self {
        Geometry::Point { coordinates: Some([x, y]) }
    }

    /// Create a LineString geometry
    pub fn line_string(coords: Vec<Position>) -> Self {
        Geometry::LineString { coordinates: coords }
    }

    /// Create a Polygon geometry
    pub fn polygon(rings: Vec<Vec<Position>>) -> Self {
        Geometry::Polygon { coordinates: rings }
    }

    pub fn multi_point(coords: Vec<Position>) -> Self {
        Geometry::MultiPoint { coordinates: coords }
    }

    pub fn multi_line_string(lines: Vec<Vec<Position>>) -> Self {
        Geometry::MultiLineString { coordinates: lines }
    }

    pub fn multi_polygon(polygons: Vec<Vec<Vec<Position>>>) -> Self {
        Geometry::MultiPolygon { coordinates: polygons }
    }

    pub fn collection(geometries: Vec<Geometry>) -> Self {
        Geometry::GeometryCollection { geometries }
    }

    /// The `EMPTY` geometry of the given type
    pub fn empty(geometry_type: GeometryType) -> Self {
        match geometry_type {
            GeometryType::Point => Geometry::Point { coordinates: None },
            GeometryType::LineString => Geometry::line_string(Vec::new()),
            GeometryType::Polygon => Geometry::polygon(Vec::new()),
            GeometryType::MultiPoint => Geometry::multi_point(Vec::new()),
            GeometryType::MultiLineString => Geometry::multi_line_string(Vec::new()),
            GeometryType::MultiPolygon => Geometry::multi_polygon(Vec::new()),
            GeometryType::GeometryCollection => Geometry::collection(Vec::new()),
        }
    }

    /// Get the geometry type
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point { .. } => GeometryType::Point,
            Geometry::LineString { .. } => GeometryType::LineString,
            Geometry::Polygon { .. } => GeometryType::Polygon,
            Geometry::MultiPoint { .. } => GeometryType::MultiPoint,
            Geometry::MultiLineString { .. } => GeometryType::MultiLineString,
            Geometry::MultiPolygon { .. } => GeometryType::MultiPolygon,
            Geometry::GeometryCollection { .. } => GeometryType::GeometryCollection,
        }
    }

    /// True when the top-level coordinates (or geometries) sequence has no elements
    pub fn is_empty(&self) -> bool {
        match self {
            Geometry::Point { coordinates } => coordinates.is_none(),
            Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
                coordinates.is_empty()
            }
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                coordinates.is_empty()
            }
            Geometry::MultiPolygon { coordinates } => coordinates.is_empty(),
            Geometry::GeometryCollection { geometries } => geometries.is_empty(),
        }
    }

    /// Swap longitude and latitude in every position, recursing into collections.
    pub fn reverse_axes(&mut self) {
        fn swap_all(positions: &mut [Position]) {
            positions.iter_mut().for_each(|p| p.swap(0, 1));
        }

        match self {
            Geometry::Point { coordinates } => {
                if let Some(p) = coordinates {
                    p.swap(0, 1);
                }
            }
            Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
                swap_all(coordinates)
            }
            Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => {
                coordinates.iter_mut().for_each(|ring| swap_all(ring))
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter_mut()
                .flat_map(|poly| poly.iter_mut())
                .for_each(|ring| swap_all(ring)),
            Geometry::GeometryCollection { geometries } => {
                geometries.iter_mut().for_each(Geometry::reverse_axes)
            }
        }
    }

    /// Owned variant of [`Geometry::reverse_axes`]
    pub fn with_reversed_axes(mut self) -> Self {
        self.reverse_axes();
        self
    }

    /// Parse from a serde_json::Value (GeoJSON)
    pub fn from_geojson(value: &serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Convert to serde_json::Value (GeoJSON)
    pub fn to_geojson(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| GeofeatError::Serialization(e.to_string()))
    }
}

/// `Option<Position>` as either `[]` or `[x, y]`
mod point_coordinates {
    use super::Position;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<Position>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(position) => position.serialize(serializer),
            None => serializer.collect_seq(std::iter::empty::<f64>()),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Position>, D::Error> {
        let values = Vec::<f64>::deserialize(deserializer)?;
        match values.as_slice() {
            [] => Ok(None),
            [x, y] => Ok(Some([*x, *y])),
            other => Err(D::Error::invalid_length(
                other.len(),
                &"an empty array or a longitude/latitude pair",
            )),
        }
    }
}
