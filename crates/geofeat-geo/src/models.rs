//! Bridge between the GeoJSON-shaped [`Geometry`] and the `geo` crate.
//!
//! Used for computational geometry the codec itself does not need, such as
//! reducing candidate geometries to a representative point for ranking.

use geo::Geometry as GeoGeometry;

pub use geofeat_core::models::{Geometry, GeometryType, Position};

fn coords(positions: &[Position]) -> Vec<geo::Coord> {
    positions.iter().map(|c| geo::Coord { x: c[0], y: c[1] }).collect()
}

fn polygon(rings: &[Vec<Position>]) -> geo::Polygon {
    let mut rings = rings.iter().map(|ring| geo::LineString::new(coords(ring)));
    let exterior = rings.next().unwrap_or_else(|| geo::LineString::new(vec![]));
    geo::Polygon::new(exterior, rings.collect())
}

/// Convert a Geometry to a geo::Geometry
///
/// An empty point has no `geo::Point` form and maps to an empty collection.
pub fn to_geo_geometry(geom: &Geometry) -> GeoGeometry {
    match geom {
        Geometry::Point { coordinates: Some(c) } => GeoGeometry::Point(geo::Point::new(c[0], c[1])),
        Geometry::Point { coordinates: None } => {
            GeoGeometry::GeometryCollection(geo::GeometryCollection(vec![]))
        }
        Geometry::LineString { coordinates } => {
            GeoGeometry::LineString(geo::LineString::new(coords(coordinates)))
        }
        Geometry::Polygon { coordinates } => GeoGeometry::Polygon(polygon(coordinates)),
        Geometry::MultiPoint { coordinates } => GeoGeometry::MultiPoint(geo::MultiPoint::new(
            coordinates.iter().map(|c| geo::Point::new(c[0], c[1])).collect(),
        )),
        Geometry::MultiLineString { coordinates } => {
            GeoGeometry::MultiLineString(geo::MultiLineString::new(
                coordinates.iter().map(|line| geo::LineString::new(coords(line))).collect(),
            ))
        }
        Geometry::MultiPolygon { coordinates } => GeoGeometry::MultiPolygon(geo::MultiPolygon::new(
            coordinates.iter().map(|p| polygon(p)).collect(),
        )),
        Geometry::GeometryCollection { geometries } => GeoGeometry::GeometryCollection(
            geo::GeometryCollection(geometries.iter().map(to_geo_geometry).collect()),
        ),
    }
}

/// Extension trait for Geometry with geo-crate operations
pub trait GeometryExt {
    /// Convert to geo::Geometry
    fn to_geo(&self) -> GeoGeometry;

    /// Get the centroid as coordinates
    fn centroid_coords(&self) -> Option<Position>;
}

impl GeometryExt for Geometry {
    fn to_geo(&self) -> GeoGeometry {
        to_geo_geometry(self)
    }

    fn centroid_coords(&self) -> Option<Position> {
        use geo::algorithm::centroid::Centroid;
        self.to_geo().centroid().map(|p| [p.x(), p.y()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_to_geo() {
        let geom = Geometry::point(115.0, -8.5);
        assert_eq!(to_geo_geometry(&geom), GeoGeometry::Point(geo::Point::new(115.0, -8.5)));
    }

    #[test]
    fn test_polygon_with_hole_to_geo() {
        let geom = Geometry::polygon(vec![
            vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]],
            vec![[1.0, 1.0], [2.0, 1.0], [2.0, 2.0], [1.0, 1.0]],
        ]);
        let GeoGeometry::Polygon(polygon) = to_geo_geometry(&geom) else {
            panic!("expected a polygon");
        };
        assert_eq!(polygon.exterior().0.len(), 5);
        assert_eq!(polygon.interiors().len(), 1);
        assert_eq!(polygon.interiors()[0].0[1], geo::Coord { x: 2.0, y: 1.0 });
    }

    #[test]
    fn test_collection_to_geo() {
        let geom = Geometry::collection(vec![
            Geometry::point(1.0, 2.0),
            Geometry::multi_line_string(vec![vec![[0.0, 0.0], [1.0, 1.0]]]),
        ]);
        let GeoGeometry::GeometryCollection(collection) = geom.to_geo() else {
            panic!("expected a collection");
        };
        assert_eq!(collection.0.len(), 2);
        assert!(matches!(collection.0[1], GeoGeometry::MultiLineString(ref mls) if mls.0.len() == 1));
    }

    #[test]
    fn test_empty_point_is_empty_collection() {
        let geom = Geometry::empty(GeometryType::Point);
        assert_eq!(
            to_geo_geometry(&geom),
            GeoGeometry::GeometryCollection(geo::GeometryCollection(vec![]))
        );
    }

    #[test]
    fn test_centroid() {
        let geom = Geometry::polygon(vec![vec![
            [0.0, 0.0],
            [2.0, 0.0],
            [2.0, 2.0],
            [0.0, 2.0],
            [0.0, 0.0],
        ]]);
        let centroid = geom.centroid_coords().unwrap();
        assert!((centroid[0] - 1.0).abs() < 1e-10);
        assert!((centroid[1] - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_geometries_have_no_centroid() {
        for t in GeometryType::ALL {
            assert!(Geometry::empty(t).centroid_coords().is_none(), "{} should have no centroid", t);
        }
    }
}
