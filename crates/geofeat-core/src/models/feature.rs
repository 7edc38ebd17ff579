//! GeoJSON Feature, FeatureCollection and the object enum that dispatches on `type`.

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

use super::geometry::{Geometry, GeometryType};
use crate::error::{GeofeatError, Result};

/// Ordered feature property mapping
pub type Properties = serde_json::Map<String, Value>;

/// A geometry paired with its properties
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Feature {
    /// `null` in GeoJSON when the feature is unlocated
    pub geometry: Option<Geometry>,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self { geometry: Some(geometry), properties }
    }
}

impl Serialize for Feature {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "Feature")?;
        map.serialize_entry("geometry", &self.geometry)?;
        map.serialize_entry("properties", &self.properties)?;
        map.end()
    }
}

/// Ordered list of features
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }
}

impl Serialize for FeatureCollection {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "FeatureCollection")?;
        map.serialize_entry("features", &self.features)?;
        map.end()
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Properties, D::Error> {
    Ok(Option::<Properties>::deserialize(deserializer)?.unwrap_or_default())
}

/// Any GeoJSON object carrying a `type` tag
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeoJsonObject {
    Geometry(Geometry),
    Feature(Feature),
    FeatureCollection(FeatureCollection),
}

impl GeoJsonObject {
    /// The GeoJSON `type` tag of this object
    pub fn type_name(&self) -> &'static str {
        match self {
            GeoJsonObject::Geometry(g) => g.geometry_type().as_str(),
            GeoJsonObject::Feature(_) => "Feature",
            GeoJsonObject::FeatureCollection(_) => "FeatureCollection",
        }
    }

    /// Dispatch a JSON value on its `type` member.
    ///
    /// Unknown tags yield [`GeofeatError::UnrecognizedType`]; a known tag with a
    /// malformed body yields [`GeofeatError::GeoJson`].
    pub fn from_value(value: Value) -> Result<Self> {
        let tag = type_tag(&value)?.to_string();
        match tag.as_str() {
            "Feature" => Ok(GeoJsonObject::Feature(serde_json::from_value(value)?)),
            "FeatureCollection" => {
                Ok(GeoJsonObject::FeatureCollection(serde_json::from_value(value)?))
            }
            t if GeometryType::from_geojson_type(t).is_some() => {
                Ok(GeoJsonObject::Geometry(serde_json::from_value(value)?))
            }
            _ => Err(GeofeatError::UnrecognizedType {
                kind: "GeoJSON object".to_string(),
                type_name: tag,
            }),
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| GeofeatError::Serialization(e.to_string()))
    }

    /// Compact GeoJSON text
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| GeofeatError::Serialization(e.to_string()))
    }
}

/// Read the `type` member of a GeoJSON-shaped value
pub fn type_tag(value: &Value) -> Result<&str> {
    value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| GeofeatError::GeoJson("missing or non-string 'type' member".to_string()))
}

impl FromStr for GeoJsonObject {
    type Err = GeofeatError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(value)
    }
}

impl<'de> Deserialize<'de> for GeoJsonObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        GeoJsonObject::from_value(value).map_err(D::Error::custom)
    }
}

impl From<Geometry> for GeoJsonObject {
    fn from(geometry: Geometry) -> Self {
        GeoJsonObject::Geometry(geometry)
    }
}

impl From<Feature> for GeoJsonObject {
    fn from(feature: Feature) -> Self {
        GeoJsonObject::Feature(feature)
    }
}

impl From<FeatureCollection> for GeoJsonObject {
    fn from(collection: FeatureCollection) -> Self {
        GeoJsonObject::FeatureCollection(collection)
    }
}
