//! Coordinate axis reversal between `[lng, lat]` and `[lat, lng]`.

use geofeat_core::models::{GeoJsonObject, Geometry};
use serde_json::Value;

/// Swap the two components of every coordinate pair in a GeoJSON-shaped value.
///
/// A value with `geometries` recurses into each member, otherwise its
/// `coordinates` are reversed. Features recurse into `geometry` and
/// FeatureCollections into `features`. Applying it twice is the identity.
pub fn reverse_coordinate_axes(mut value: Value) -> Value {
    reverse_in_place(&mut value);
    value
}

/// In-place form of [`reverse_coordinate_axes`]
pub fn reverse_in_place(value: &mut Value) {
    let Value::Object(map) = value else {
        return;
    };

    if let Some(Value::Array(geometries)) = map.get_mut("geometries") {
        geometries.iter_mut().for_each(reverse_in_place);
        return;
    }
    if let Some(coordinates) = map.get_mut("coordinates") {
        reverse_coordinates(coordinates);
        return;
    }
    if let Some(geometry) = map.get_mut("geometry") {
        reverse_in_place(geometry);
        return;
    }
    if let Some(Value::Array(features)) = map.get_mut("features") {
        features.iter_mut().for_each(reverse_in_place);
    }
}

fn reverse_coordinates(value: &mut Value) {
    let Value::Array(items) = value else {
        return;
    };

    if items.len() == 2 && items.iter().all(Value::is_number) {
        items.swap(0, 1);
    } else {
        items.iter_mut().for_each(reverse_coordinates);
    }
}

/// Typed counterpart of [`reverse_coordinate_axes`]
pub fn reverse_object_axes(object: GeoJsonObject) -> GeoJsonObject {
    match object {
        GeoJsonObject::Geometry(geometry) => GeoJsonObject::Geometry(geometry.with_reversed_axes()),
        GeoJsonObject::Feature(mut feature) => {
            if let Some(geometry) = feature.geometry.as_mut() {
                geometry.reverse_axes();
            }
            GeoJsonObject::Feature(feature)
        }
        GeoJsonObject::FeatureCollection(mut collection) => {
            collection
                .features
                .iter_mut()
                .filter_map(|f| f.geometry.as_mut())
                .for_each(Geometry::reverse_axes);
            GeoJsonObject::FeatureCollection(collection)
        }
    }
}
