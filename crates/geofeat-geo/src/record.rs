//! Adapter for record layers that store geometry columns as WKT.
//!
//! Reading turns the stored text into GeoJSON for the client, writing turns
//! client GeoJSON into a `GeomFromText(...)` expression for insertion.

use geofeat_core::config::LayeredConfig;
use geofeat_core::error::{GeofeatError, Result};
use geofeat_core::models::{Feature, FeatureCollection, GeoJsonObject, Geometry, Properties};
use serde_json::Value;

use crate::axes::reverse_object_axes;
use crate::codec::GeometryCodec;

/// Column types that hold geometry
pub const SPATIAL_COLUMN_TYPES: [&str; 8] = [
    "point",
    "linestring",
    "polygon",
    "multipoint",
    "multilinestring",
    "multipolygon",
    "geometry",
    "geometrycollection",
];

/// Whether a column of database type `db_type` holds geometry
pub fn is_spatial_column(db_type: &str) -> bool {
    SPATIAL_COLUMN_TYPES.iter().any(|t| t.eq_ignore_ascii_case(db_type.trim()))
}

/// Select fragment returning `field` as WKT under its own name
pub fn as_text_select(field: &str) -> String {
    format!("AsText({field}) AS {field}")
}

/// WKT select fragments for every spatial column among `(name, db_type)` pairs
pub fn spatial_selects<'a, I>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    columns
        .into_iter()
        .filter(|(_, db_type)| is_spatial_column(db_type))
        .map(|(name, _)| as_text_select(name))
        .collect()
}

/// Properties carrying only the record's primary key as `id`
pub fn id_properties(id: impl Into<Value>) -> Properties {
    let mut properties = Properties::new();
    properties.insert("id".to_string(), id.into());
    properties
}

/// Converts spatial attribute values on their way out of and into storage
#[derive(Debug, Clone, Copy, Default)]
pub struct SpatialAttributes {
    codec: GeometryCodec,
}

impl SpatialAttributes {
    pub fn new(codec: GeometryCodec) -> Self {
        Self { codec }
    }

    pub fn from_config(config: &LayeredConfig) -> Self {
        Self::new(GeometryCodec::from_config(config))
    }

    pub fn codec(&self) -> &GeometryCodec {
        &self.codec
    }

    /// Convert stored WKT into GeoJSON text.
    ///
    /// A GeometryCollection always becomes a FeatureCollection, even with a
    /// single member; anything else becomes a Feature. `properties` is called
    /// with the field name and each geometry a Feature is made for. Empty
    /// values and unrecognized geometries give `Ok(None)`.
    pub fn read<F>(&self, field: &str, wkt: &str, mut properties: F) -> Result<Option<String>>
    where
        F: FnMut(&str, &Geometry) -> Properties,
    {
        if wkt.trim().is_empty() {
            return Ok(None);
        }

        let geometry = match self.codec.decode_wkt(wkt) {
            Ok(geometry) => geometry,
            Err(e @ GeofeatError::UnparseableGeometry { .. }) => {
                tracing::warn!(field = %field, error = %e, "Skipping unreadable spatial attribute");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let object: GeoJsonObject = match geometry {
            Geometry::GeometryCollection { geometries } => {
                let features = geometries
                    .into_iter()
                    .map(|member| {
                        let props = properties(field, &member);
                        Feature::new(member, props)
                    })
                    .collect();
                FeatureCollection::new(features).into()
            }
            geometry => {
                let props = properties(field, &geometry);
                Feature::new(geometry, props).into()
            }
        };

        let object = if self.codec.axis_order().needs_reversal() {
            reverse_object_axes(object)
        } else {
            object
        };

        tracing::debug!(field = %field, kind = object.type_name(), "Read spatial attribute");
        object.to_json_string().map(Some)
    }

    /// Convert client GeoJSON text into a `GeomFromText('<wkt>')` expression.
    ///
    /// Empty values and unrecognized features give `Ok(None)`, leaving the
    /// attribute untouched.
    pub fn write(&self, field: &str, geojson: &str) -> Result<Option<String>> {
        if geojson.trim().is_empty() {
            return Ok(None);
        }

        match self.codec.geojson_to_wkt(geojson) {
            Ok(wkt) => {
                tracing::debug!(field = %field, wkt = %wkt, "Wrote spatial attribute");
                Ok(Some(format!("GeomFromText('{}')", wkt)))
            }
            Err(e) if e.is_skippable() => {
                tracing::warn!(field = %field, error = %e, "Skipping unwritable spatial attribute");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
