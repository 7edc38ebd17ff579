//! The geometry codec: WKT <-> Geometry <-> GeoJSON Feature.

use geofeat_core::config::LayeredConfig;
use geofeat_core::error::Result;
use geofeat_core::models::{AxisOrder, CodecOptions, GeoJsonObject, Geometry, Properties};
use serde_json::Value;

use crate::axes::{self, reverse_object_axes};
use crate::feature::{self, feature_to_geometry, geometry_to_feature, geometry_to_feature_with};
use crate::wkt;

/// Bidirectional converter between WKT text and the GeoJSON model.
///
/// The codec is stateless apart from its options and can be shared freely
/// across threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeometryCodec {
    options: CodecOptions,
    axis_order: AxisOrder,
}

impl GeometryCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options, axis_order: AxisOrder::default() }
    }

    pub fn from_config(config: &LayeredConfig) -> Self {
        Self { options: config.codec_options(), axis_order: config.axis_order.value }
    }

    /// Axis order of the GeoJSON produced by and accepted by the text pipelines
    pub fn with_axis_order(mut self, axis_order: AxisOrder) -> Self {
        self.axis_order = axis_order;
        self
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    pub fn axis_order(&self) -> AxisOrder {
        self.axis_order
    }

    pub fn decode_wkt(&self, text: &str) -> Result<Geometry> {
        wkt::decode(text, &self.options)
    }

    pub fn encode_wkt(&self, geometry: &Geometry) -> String {
        wkt::encode(geometry)
    }

    pub fn encode_wkt_value(&self, value: &Value) -> Result<String> {
        wkt::encode_value(value, &self.options)
    }

    pub fn geometry_to_feature(
        &self,
        object: impl Into<GeoJsonObject>,
        properties: &Properties,
    ) -> GeoJsonObject {
        geometry_to_feature(object, properties)
    }

    pub fn geometry_to_feature_with<F>(&self, object: impl Into<GeoJsonObject>, properties: F) -> GeoJsonObject
    where
        F: FnMut(usize, &Geometry) -> Properties,
    {
        geometry_to_feature_with(object, properties)
    }

    pub fn feature_to_geometry(&self, object: impl Into<GeoJsonObject>) -> Result<Geometry> {
        feature_to_geometry(object)
    }

    pub fn reverse_coordinate_axes(&self, value: Value) -> Value {
        axes::reverse_coordinate_axes(value)
    }

    /// Decode WKT and wrap it as a Feature or FeatureCollection in the client's axis order
    pub fn wkt_to_feature(&self, text: &str, properties: &Properties) -> Result<GeoJsonObject> {
        let geometry = self.decode_wkt(text)?;
        Ok(self.to_client(geometry_to_feature(geometry, properties)))
    }

    /// [`GeometryCodec::wkt_to_feature`] with per-member properties
    pub fn wkt_to_feature_with<F>(&self, text: &str, properties: F) -> Result<GeoJsonObject>
    where
        F: FnMut(usize, &Geometry) -> Properties,
    {
        let geometry = self.decode_wkt(text)?;
        Ok(self.to_client(geometry_to_feature_with(geometry, properties)))
    }

    /// Unwrap a client object in the client's axis order and encode it as WKT
    pub fn feature_to_wkt(&self, object: impl Into<GeoJsonObject>) -> Result<String> {
        let geometry = feature_to_geometry(self.to_client(object.into()))?;
        Ok(wkt::encode(&geometry))
    }

    pub fn wkt_to_geojson(&self, text: &str, properties: &Properties) -> Result<String> {
        self.wkt_to_feature(text, properties)?.to_json_string()
    }

    /// Parse GeoJSON text and encode its geometry as WKT.
    ///
    /// Unknown `type` tags fail as "unrecognized feature type".
    pub fn geojson_to_wkt(&self, text: &str) -> Result<String> {
        let value: Value = serde_json::from_str(text)?;
        let geometry = feature::feature_to_geometry_value(&value)?;
        let geometry =
            if self.axis_order.needs_reversal() { geometry.with_reversed_axes() } else { geometry };
        Ok(wkt::encode(&geometry))
    }

    // Reversal is an involution, so the same step serves both directions.
    fn to_client(&self, object: GeoJsonObject) -> GeoJsonObject {
        if self.axis_order.needs_reversal() {
            reverse_object_axes(object)
        } else {
            object
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofeat_core::error::GeofeatError;
    use serde_json::json;

    #[test]
    fn test_wkt_to_geojson_pipeline() {
        let codec = GeometryCodec::default();
        let mut properties = Properties::new();
        properties.insert("id".to_string(), json!(7));

        let text = codec.wkt_to_geojson("POINT(4.9 52.3)", &properties).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [4.9, 52.3]},
                "properties": {"id": 7}
            })
        );
    }

    #[test]
    fn test_geojson_to_wkt_pipeline() {
        let codec = GeometryCodec::default();
        let text = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]},"properties":{}},
            {"type":"Feature","geometry":{"type":"LineString","coordinates":[[1,2],[3,4]]},"properties":{}}
        ]}"#;
        assert_eq!(
            codec.geojson_to_wkt(text).unwrap(),
            "GEOMETRYCOLLECTION(POINT(1 2),LINESTRING(1 2,3 4))"
        );
    }

    #[test]
    fn test_geojson_to_wkt_rejects_unknown_type() {
        let codec = GeometryCodec::default();
        let err = codec.geojson_to_wkt(r#"{"type":"Topology","objects":{}}"#).unwrap_err();
        assert!(matches!(err, GeofeatError::UnrecognizedType { ref kind, .. } if kind == "feature"));
    }

    #[test]
    fn test_lat_lng_clients_round_trip() {
        let codec = GeometryCodec::default().with_axis_order(AxisOrder::LatLng);

        let feature = codec.wkt_to_feature("POINT(4.9 52.3)", &Properties::new()).unwrap();
        let value = feature.to_value().unwrap();
        assert_eq!(value["geometry"]["coordinates"], json!([52.3, 4.9]));

        assert_eq!(codec.feature_to_wkt(feature).unwrap(), "POINT(4.9 52.3)");
        assert_eq!(codec.geojson_to_wkt(&value.to_string()).unwrap(), "POINT(4.9 52.3)");
    }

    #[test]
    fn test_strict_codec() {
        let codec = GeometryCodec::new(CodecOptions::strict());
        assert!(codec.decode_wkt("POLYGON((0 0,1 1,0 0),(oops))").is_err());

        let lenient = GeometryCodec::default();
        assert_eq!(
            lenient.decode_wkt("POLYGON((0 0,1 1,0 0),(oops))").unwrap(),
            Geometry::polygon(vec![vec![[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]], vec![]])
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = LayeredConfig::with_defaults();
        config.update_from_cli(geofeat_core::config::CliConfigOverrides {
            legacy_markers: Some(true),
            axis_order: Some(AxisOrder::LatLng),
            ..Default::default()
        });

        let codec = GeometryCodec::from_config(&config);
        assert!(codec.options().legacy_markers);
        assert_eq!(codec.axis_order(), AxisOrder::LatLng);
        assert_eq!(
            codec.encode_wkt_value(&json!({"type": "Circle", "coordinates": [1, 2]})).unwrap(),
            "CIRCLE not implemented"
        );
    }
}
