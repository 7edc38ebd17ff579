//! Property tests for the WKT/GeoJSON codec
//!
//! This test suite verifies that:
//! - Encoded WKT decodes back to the same geometry
//! - Empty geometries encode with an `EMPTY` suffix and decode to the same type
//! - Wrapping a geometry as a feature and unwrapping it is lossless
//! - Single-member collections collapse to a plain feature
//! - Axis reversal is an involution

use geofeat_core::models::{CodecOptions, GeoJsonObject, Geometry, GeometryType, Position, Properties};
use geofeat_geo::feature::{feature_to_geometry, geometry_to_feature};
use geofeat_geo::{reverse_coordinate_axes, wkt, GeometryCodec};
use proptest::collection::vec;
use proptest::prelude::*;

fn position() -> impl Strategy<Value = Position> {
    (-180.0f64..180.0, -90.0f64..90.0).prop_map(|(x, y)| [x, y])
}

fn leaf() -> impl Strategy<Value = Geometry> {
    prop_oneof![
        position().prop_map(|[x, y]| Geometry::point(x, y)),
        vec(position(), 1..6).prop_map(Geometry::line_string),
        vec(position(), 1..6).prop_map(Geometry::multi_point),
        vec(vec(position(), 1..5), 1..4).prop_map(Geometry::polygon),
        vec(vec(position(), 1..5), 1..4).prop_map(Geometry::multi_line_string),
        vec(vec(vec(position(), 1..5), 1..3), 1..3).prop_map(Geometry::multi_polygon),
    ]
}

fn collection() -> impl Strategy<Value = Geometry> {
    vec(leaf(), 0..5).prop_map(Geometry::collection)
}

fn any_geometry() -> impl Strategy<Value = Geometry> {
    prop_oneof![3 => leaf(), 1 => collection()]
}

fn positions_close(a: &[Position], b: &[Position]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(p, q)| (p[0] - q[0]).abs() <= 1e-9 && (p[1] - q[1]).abs() <= 1e-9)
}

fn nested_close<T, F>(a: &[T], b: &[T], close: F) -> bool
where
    F: Fn(&T, &T) -> bool,
{
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| close(x, y))
}

fn geometry_close(a: &Geometry, b: &Geometry) -> bool {
    use Geometry::*;
    match (a, b) {
        (Point { coordinates: Some(p) }, Point { coordinates: Some(q) }) => positions_close(&[*p], &[*q]),
        (Point { coordinates: None }, Point { coordinates: None }) => true,
        (LineString { coordinates: p }, LineString { coordinates: q })
        | (MultiPoint { coordinates: p }, MultiPoint { coordinates: q }) => positions_close(p, q),
        (Polygon { coordinates: p }, Polygon { coordinates: q })
        | (MultiLineString { coordinates: p }, MultiLineString { coordinates: q }) => {
            nested_close(p, q, |x, y| positions_close(x, y))
        }
        (MultiPolygon { coordinates: p }, MultiPolygon { coordinates: q }) => {
            nested_close(p, q, |x, y| nested_close(x, y, |r, s| positions_close(r, s)))
        }
        (GeometryCollection { geometries: p }, GeometryCollection { geometries: q }) => {
            nested_close(p, q, geometry_close)
        }
        _ => false,
    }
}

proptest! {
    #[test]
    fn prop_wkt_round_trip(geometry in any_geometry()) {
        let text = wkt::encode(&geometry);
        let decoded = wkt::decode(&text, &CodecOptions::default()).unwrap();
        prop_assert!(geometry_close(&geometry, &decoded), "{} decoded to {:?}", text, decoded);
    }

    #[test]
    fn prop_strict_mode_accepts_encoder_output(geometry in any_geometry()) {
        let text = wkt::encode(&geometry);
        prop_assert!(wkt::decode(&text, &CodecOptions::strict()).is_ok(), "strict rejected {}", text);
    }

    #[test]
    fn prop_encoding_is_a_fixed_point(geometry in any_geometry()) {
        let once = wkt::encode(&geometry);
        let twice = wkt::encode(&wkt::decode(&once, &CodecOptions::default()).unwrap());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn prop_feature_wrap_unwrap(geometry in leaf()) {
        let feature = geometry_to_feature(geometry.clone(), &Properties::new());
        prop_assert!(matches!(feature, GeoJsonObject::Feature(_)));
        prop_assert_eq!(feature_to_geometry(feature).unwrap(), geometry);
    }

    #[test]
    fn prop_collection_wrap_unwrap(geometry in collection()) {
        let Geometry::GeometryCollection { geometries } = &geometry else { unreachable!() };
        let wrapped = geometry_to_feature(geometry.clone(), &Properties::new());
        let back = feature_to_geometry(wrapped.clone()).unwrap();

        if geometries.len() == 1 {
            prop_assert!(matches!(wrapped, GeoJsonObject::Feature(_)));
            prop_assert_eq!(&back, &geometries[0]);
        } else {
            prop_assert!(matches!(wrapped, GeoJsonObject::FeatureCollection(_)));
            prop_assert_eq!(back, geometry);
        }
    }

    #[test]
    fn prop_axis_reversal_involution(geometry in any_geometry()) {
        let value = geometry.to_geojson().unwrap();
        let twice = reverse_coordinate_axes(reverse_coordinate_axes(value.clone()));
        prop_assert_eq!(twice, value);

        let typed = geometry.clone().with_reversed_axes().with_reversed_axes();
        prop_assert_eq!(typed, geometry);
    }

    #[test]
    fn prop_text_pipeline_round_trip(geometry in leaf()) {
        let codec = GeometryCodec::default();
        let text = wkt::encode(&geometry);
        let geojson = codec.wkt_to_geojson(&text, &Properties::new()).unwrap();
        let back = wkt::decode(&codec.geojson_to_wkt(&geojson).unwrap(), &CodecOptions::default()).unwrap();
        prop_assert!(geometry_close(&geometry, &back), "{} came back as {:?}", text, back);
    }
}

#[test]
fn test_empty_round_trip_for_every_type() {
    for geometry_type in GeometryType::ALL {
        let empty = Geometry::empty(geometry_type);
        let text = wkt::encode(&empty);
        assert!(text.ends_with(" EMPTY"), "{} should end with EMPTY", text);

        let decoded = wkt::decode(&text, &CodecOptions::default()).unwrap();
        assert_eq!(decoded.geometry_type(), geometry_type);
        assert!(decoded.is_empty());
    }
}

#[test]
fn test_point_scenario() {
    let decoded = wkt::decode("POINT(4.9 52.3)", &CodecOptions::default()).unwrap();
    assert_eq!(decoded, Geometry::point(4.9, 52.3));
    assert_eq!(wkt::encode(&decoded), "POINT(4.9 52.3)");
}

#[test]
fn test_empty_point_geojson() {
    let value = Geometry::empty(GeometryType::Point).to_geojson().unwrap();
    assert_eq!(value, serde_json::json!({"type": "Point", "coordinates": []}));
}
