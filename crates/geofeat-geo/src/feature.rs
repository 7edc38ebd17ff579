//! Wrapping geometries as GeoJSON features and unwrapping them again.

use geofeat_core::error::{GeofeatError, Result};
use geofeat_core::models::{Feature, FeatureCollection, GeoJsonObject, Geometry, Properties};
use serde_json::Value;

/// Wrap a geometry as a Feature, giving every synthesized feature the same properties.
///
/// A GeometryCollection with exactly one member becomes a Feature of that
/// member; any other collection becomes a FeatureCollection with one Feature
/// per member. Features and FeatureCollections pass through unchanged.
pub fn geometry_to_feature(object: impl Into<GeoJsonObject>, properties: &Properties) -> GeoJsonObject {
    geometry_to_feature_with(object, |_, _| properties.clone())
}

/// Like [`geometry_to_feature`], with properties built per synthesized feature.
///
/// The builder receives the member index within the collection (0 for a
/// singular geometry) and the member geometry.
pub fn geometry_to_feature_with<F>(object: impl Into<GeoJsonObject>, mut properties: F) -> GeoJsonObject
where
    F: FnMut(usize, &Geometry) -> Properties,
{
    match object.into() {
        GeoJsonObject::Geometry(Geometry::GeometryCollection { mut geometries }) => {
            if geometries.len() == 1 {
                let member = geometries.remove(0);
                let props = properties(0, &member);
                GeoJsonObject::Feature(Feature::new(member, props))
            } else {
                let features = geometries
                    .into_iter()
                    .enumerate()
                    .map(|(i, member)| {
                        let props = properties(i, &member);
                        Feature::new(member, props)
                    })
                    .collect();
                GeoJsonObject::FeatureCollection(FeatureCollection::new(features))
            }
        }
        GeoJsonObject::Geometry(geometry) => {
            let props = properties(0, &geometry);
            GeoJsonObject::Feature(Feature::new(geometry, props))
        }
        already_feature => already_feature,
    }
}

/// Extract the geometry carried by a Feature, FeatureCollection, or bare Geometry.
///
/// A FeatureCollection with exactly one feature yields that feature's geometry;
/// otherwise the member geometries are gathered, in order, into a
/// GeometryCollection. Features without geometry fail with `MissingGeometry`.
pub fn feature_to_geometry(object: impl Into<GeoJsonObject>) -> Result<Geometry> {
    match object.into() {
        GeoJsonObject::Geometry(geometry) => Ok(geometry),
        GeoJsonObject::Feature(feature) => feature.geometry.ok_or(GeofeatError::MissingGeometry),
        GeoJsonObject::FeatureCollection(collection) => {
            let mut features = collection.features;
            if features.len() == 1 {
                return features.remove(0).geometry.ok_or(GeofeatError::MissingGeometry);
            }
            let geometries = features
                .into_iter()
                .map(|f| f.geometry.ok_or(GeofeatError::MissingGeometry))
                .collect::<Result<Vec<_>>>()?;
            Ok(Geometry::collection(geometries))
        }
    }
}

/// Value-level [`geometry_to_feature`]; unknown tags fail as "unrecognized geometry type".
pub fn geometry_to_feature_value(value: &Value, properties: &Properties) -> Result<Value> {
    let object = parse_object(value, |t| GeofeatError::unrecognized_geometry(t))?;
    geometry_to_feature(object, properties).to_value()
}

/// Value-level [`feature_to_geometry`]; unknown tags fail as "unrecognized feature type".
pub fn feature_to_geometry_value(value: &Value) -> Result<Geometry> {
    let object = parse_object(value, |t| GeofeatError::unrecognized_feature(t))?;
    feature_to_geometry(object)
}

fn parse_object(value: &Value, unrecognized: fn(String) -> GeofeatError) -> Result<GeoJsonObject> {
    match GeoJsonObject::from_value(value.clone()) {
        Err(GeofeatError::UnrecognizedType { type_name, .. }) => Err(unrecognized(type_name)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geofeat_core::models::GeometryType;
    use serde_json::json;

    fn props(id: i64) -> Properties {
        let mut properties = Properties::new();
        properties.insert("id".to_string(), json!(id));
        properties
    }

    #[test]
    fn test_point_to_feature_scenario() {
        let feature = geometry_to_feature(Geometry::point(4.9, 52.3), &props(7));
        assert_eq!(
            feature.to_value().unwrap(),
            json!({
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [4.9, 52.3]},
                "properties": {"id": 7}
            })
        );
    }

    #[test]
    fn test_single_member_collection_collapses() {
        let collection = Geometry::collection(vec![Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]])]);
        let feature = geometry_to_feature(collection, &Properties::new());

        let GeoJsonObject::Feature(ref inner) = feature else {
            panic!("Expected Feature, got {:?}", feature);
        };
        assert_eq!(inner.geometry.as_ref().map(Geometry::geometry_type), Some(GeometryType::LineString));

        let back = feature_to_geometry(feature).unwrap();
        assert_eq!(back, Geometry::line_string(vec![[0.0, 0.0], [1.0, 1.0]]));
    }

    #[test]
    fn test_multi_member_collection_shares_properties() {
        let collection = Geometry::collection(vec![Geometry::point(1.0, 2.0), Geometry::point(3.0, 4.0)]);
        let result = geometry_to_feature(collection.clone(), &props(3));

        let GeoJsonObject::FeatureCollection(ref fc) = result else {
            panic!("Expected FeatureCollection, got {:?}", result);
        };
        assert_eq!(fc.features.len(), 2);
        assert!(fc.features.iter().all(|f| f.properties == props(3)));

        assert_eq!(feature_to_geometry(result).unwrap(), collection);
    }

    #[test]
    fn test_empty_collection_becomes_empty_feature_collection() {
        let result = geometry_to_feature(Geometry::collection(vec![]), &Properties::new());
        assert_eq!(result, GeoJsonObject::FeatureCollection(FeatureCollection::default()));
        assert_eq!(feature_to_geometry(result).unwrap(), Geometry::collection(vec![]));
    }

    #[test]
    fn test_property_builder_per_member() {
        let collection = Geometry::collection(vec![
            Geometry::point(1.0, 2.0),
            Geometry::polygon(vec![]),
            Geometry::point(5.0, 6.0),
        ]);
        let result = geometry_to_feature_with(collection, |i, geometry| {
            let mut p = props(i as i64);
            p.insert("kind".to_string(), json!(geometry.geometry_type().as_str()));
            p
        });

        let GeoJsonObject::FeatureCollection(fc) = result else { panic!("Expected FeatureCollection") };
        let ids: Vec<i64> = fc.features.iter().map(|f| f.properties["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(fc.features[1].properties["kind"], "Polygon");
    }

    #[test]
    fn test_features_pass_through() {
        let feature = GeoJsonObject::Feature(Feature::new(Geometry::point(1.0, 1.0), props(1)));
        assert_eq!(geometry_to_feature(feature.clone(), &props(99)), feature);

        let collection = GeoJsonObject::FeatureCollection(FeatureCollection::new(vec![]));
        assert_eq!(geometry_to_feature(collection.clone(), &props(99)), collection);
    }

    #[test]
    fn test_feature_without_geometry() {
        let feature = Feature { geometry: None, properties: Properties::new() };
        assert!(matches!(feature_to_geometry(feature), Err(GeofeatError::MissingGeometry)));
    }

    #[test]
    fn test_value_level_unrecognized_types() {
        let circle = json!({"type": "Circle", "coordinates": [0, 0]});

        let err = geometry_to_feature_value(&circle, &Properties::new()).unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized geometry type: Circle");

        let err = feature_to_geometry_value(&circle).unwrap_err();
        assert_eq!(err.to_string(), "Unrecognized feature type: Circle");
        assert!(err.is_skippable());
    }

    #[test]
    fn test_value_level_feature_collection() {
        let value = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1, 2]}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [3, 4]}, "properties": {}}
            ]
        });
        assert_eq!(
            feature_to_geometry_value(&value).unwrap(),
            Geometry::collection(vec![Geometry::point(1.0, 2.0), Geometry::point(3.0, 4.0)])
        );
    }
}
