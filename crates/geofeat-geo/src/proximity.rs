//! Bounded great-circle proximity planning.
//!
//! A [`ProximityPlan`] is a two-stage filter: an axis-aligned bounding box
//! that a storage engine can answer from an index, followed by the exact
//! distance threshold and ordering. The box is always a superset of the
//! search cap, so it is only ever a pre-filter.

mod expr;

use std::f64::consts::FRAC_PI_2;

use geofeat_core::config::LayeredConfig;
use geofeat_core::error::{GeofeatError, Result};
use geofeat_core::models::{Feature, GeoJsonObject, Geometry, Position, KM_PER_DEGREE};
use serde::Serialize;

pub use expr::{DistanceExpr, Expr};

use crate::feature::feature_to_geometry;
use crate::models::GeometryExt;

/// Reference point of a proximity search
#[derive(Debug, Clone, PartialEq)]
pub enum ProximityOrigin {
    /// Raw `[lng, lat]` pair
    Coordinates(Position),
    /// A GeoJSON object that must resolve to a single non-empty Point
    Object(GeoJsonObject),
}

impl ProximityOrigin {
    /// Resolve to a `[lng, lat]` pair
    pub fn resolve(self) -> Result<Position> {
        match self {
            ProximityOrigin::Coordinates(position) => Ok(position),
            ProximityOrigin::Object(object) => match feature_to_geometry(object)? {
                Geometry::Point { coordinates: Some(position) } => Ok(position),
                other => Err(GeofeatError::UnsupportedProximityGeometry {
                    type_name: describe(&other),
                }),
            },
        }
    }
}

fn describe(geometry: &Geometry) -> String {
    if geometry.is_empty() {
        format!("empty {}", geometry.geometry_type())
    } else {
        geometry.geometry_type().to_string()
    }
}

impl From<Position> for ProximityOrigin {
    fn from(position: Position) -> Self {
        ProximityOrigin::Coordinates(position)
    }
}

impl From<(f64, f64)> for ProximityOrigin {
    fn from((lng, lat): (f64, f64)) -> Self {
        ProximityOrigin::Coordinates([lng, lat])
    }
}

impl From<GeoJsonObject> for ProximityOrigin {
    fn from(object: GeoJsonObject) -> Self {
        ProximityOrigin::Object(object)
    }
}

impl From<Geometry> for ProximityOrigin {
    fn from(geometry: Geometry) -> Self {
        ProximityOrigin::Object(geometry.into())
    }
}

impl From<Feature> for ProximityOrigin {
    fn from(feature: Feature) -> Self {
        ProximityOrigin::Object(feature.into())
    }
}

/// Inclusive latitude bounds in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatRange {
    pub min: f64,
    pub max: f64,
}

impl LatRange {
    pub fn contains(&self, lat: f64) -> bool {
        self.min <= lat && lat <= self.max
    }
}

/// Longitude bounds in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LongitudeWindow {
    /// No longitude predicate
    Unbounded,
    /// `min <= lng <= max`
    Range { min: f64, max: f64 },
    /// Crosses the antimeridian: `lng >= west OR lng <= east`
    Wrapped { west: f64, east: f64 },
}

impl LongitudeWindow {
    pub fn contains(&self, lng: f64) -> bool {
        let lng = normalize_longitude(lng);
        match *self {
            LongitudeWindow::Unbounded => true,
            LongitudeWindow::Range { min, max } => min <= lng && lng <= max,
            LongitudeWindow::Wrapped { west, east } => lng >= west || lng <= east,
        }
    }

    /// Half-width around `center` in degrees
    fn around(center: f64, half_width: f64) -> Self {
        if half_width >= 180.0 {
            return LongitudeWindow::Unbounded;
        }
        let center = normalize_longitude(center);
        let (west, east) = (center - half_width, center + half_width);
        if west < -180.0 {
            LongitudeWindow::Wrapped { west: west + 360.0, east }
        } else if east > 180.0 {
            LongitudeWindow::Wrapped { west, east: east - 360.0 }
        } else {
            LongitudeWindow::Range { min: west, max: east }
        }
    }
}

/// Map a longitude onto `[-180, 180)`; values already inside are untouched
fn normalize_longitude(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

/// Axis-aligned pre-filter
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub latitude: LatRange,
    pub longitude: LongitudeWindow,
}

impl BoundingBox {
    pub fn contains(&self, position: Position) -> bool {
        self.latitude.contains(position[1]) && self.longitude.contains(position[0])
    }

    /// Render the box as predicates over `X(attribute)` / `Y(attribute)`
    pub fn predicate(&self, attribute: &str) -> String {
        let lat = format!(
            "Y({a}) BETWEEN {} AND {}",
            self.latitude.min,
            self.latitude.max,
            a = attribute
        );
        match self.longitude {
            LongitudeWindow::Unbounded => lat,
            LongitudeWindow::Range { min, max } => {
                format!("{} AND X({}) BETWEEN {} AND {}", lat, attribute, min, max)
            }
            LongitudeWindow::Wrapped { west, east } => format!(
                "{} AND (X({a}) >= {} OR X({a}) <= {})",
                lat,
                west,
                east,
                a = attribute
            ),
        }
    }
}

/// Exact-distance predicate; the bound is exclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistanceFilter {
    pub less_than_km: f64,
}

impl DistanceFilter {
    pub fn accepts(&self, distance_km: f64) -> bool {
        distance_km < self.less_than_km
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
}

/// Ordering of the result set by the distance column
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderBy {
    pub key: String,
    pub direction: SortDirection,
}

/// Everything a query layer needs to run a bounded nearest-neighbor search
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProximityPlan {
    pub attribute: String,
    pub origin: Position,
    pub radius_km: f64,
    pub bounding_box: BoundingBox,
    pub distance: DistanceExpr,
    pub filter: DistanceFilter,
    pub order_by: OrderBy,
}

impl ProximityPlan {
    /// Name of the computed distance column
    pub const DISTANCE_KEY: &'static str = "distance";

    /// Distance in kilometers when `candidate` passes both stages
    pub fn matches(&self, candidate: Position) -> Option<f64> {
        if !self.bounding_box.contains(candidate) {
            return None;
        }
        let distance = self.distance.evaluate(candidate);
        self.filter.accepts(distance).then_some(distance)
    }

    /// [`ProximityPlan::matches`] for any geometry, measured at its centroid
    pub fn matches_geometry(&self, geometry: &Geometry) -> Option<f64> {
        match geometry {
            Geometry::Point { coordinates } => coordinates.and_then(|c| self.matches(c)),
            other => other.centroid_coords().and_then(|c| self.matches(c)),
        }
    }

    /// Keep the matching candidates, nearest first
    pub fn rank<T, I>(&self, candidates: I) -> Vec<(T, f64)>
    where
        I: IntoIterator<Item = (T, Position)>,
    {
        let mut ranked: Vec<(T, f64)> = candidates
            .into_iter()
            .filter_map(|(item, position)| self.matches(position).map(|d| (item, d)))
            .collect();
        ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
        ranked
    }
}

/// Builds [`ProximityPlan`]s on a sphere where one degree spans `km_per_degree`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityPlanner {
    km_per_degree: f64,
}

impl Default for ProximityPlanner {
    fn default() -> Self {
        Self { km_per_degree: KM_PER_DEGREE }
    }
}

impl ProximityPlanner {
    pub fn new(km_per_degree: f64) -> Result<Self> {
        if !(km_per_degree.is_finite() && km_per_degree > 0.0) {
            return Err(GeofeatError::InvalidProximityInput {
                reason: format!("km_per_degree must be positive, got {}", km_per_degree),
            });
        }
        Ok(Self { km_per_degree })
    }

    pub fn from_config(config: &LayeredConfig) -> Result<Self> {
        Self::new(config.km_per_degree.value)
    }

    pub fn km_per_degree(&self) -> f64 {
        self.km_per_degree
    }

    /// Plan a search for `attribute` values strictly closer than `radius_km` to `origin`.
    ///
    /// A non-positive radius collapses the box onto the origin and matches nothing.
    pub fn plan(
        &self,
        origin: impl Into<ProximityOrigin>,
        attribute: impl Into<String>,
        radius_km: f64,
    ) -> Result<ProximityPlan> {
        let [lng, lat] = origin.into().resolve()?;
        if !radius_km.is_finite() {
            return Err(invalid(format!("radius must be finite, got {}", radius_km)));
        }
        if !lng.is_finite() || !lat.is_finite() {
            return Err(invalid(format!("origin must be finite, got [{}, {}]", lng, lat)));
        }
        if lat.abs() > 90.0 {
            return Err(invalid(format!("latitude {} is outside [-90, 90]", lat)));
        }

        let attribute = attribute.into();
        let d_lat = radius_km.max(0.0) / self.km_per_degree;
        let bounding_box = BoundingBox {
            latitude: LatRange { min: (lat - d_lat).max(-90.0), max: (lat + d_lat).min(90.0) },
            longitude: longitude_window(lng, lat, d_lat),
        };

        Ok(ProximityPlan {
            distance: DistanceExpr::great_circle(attribute.clone(), [lng, lat], self.km_per_degree),
            attribute,
            origin: [lng, lat],
            radius_km,
            bounding_box,
            filter: DistanceFilter { less_than_km: radius_km },
            order_by: OrderBy {
                key: ProximityPlan::DISTANCE_KEY.to_string(),
                direction: SortDirection::Ascending,
            },
        })
    }
}

fn invalid(reason: String) -> GeofeatError {
    GeofeatError::InvalidProximityInput { reason }
}

/// Longitude window covering a cap of `d_lat` degrees around `(lng, lat)`.
///
/// `d_lat / cos(lat)` undershoots the true cap width away from the equator, so
/// the half-width is widened to `asin(sin(d) / cos(lat))` where that is larger.
fn longitude_window(lng: f64, lat: f64, d_lat: f64) -> LongitudeWindow {
    let phi = lat.to_radians();
    let delta = d_lat.to_radians();

    // Cap touches a pole, every meridian passes through it
    if lat.abs() >= 90.0 || delta >= FRAC_PI_2 - phi.abs() {
        return LongitudeWindow::Unbounded;
    }

    let approx = d_lat / phi.cos();
    let exact = (delta.sin() / phi.cos()).min(1.0).asin().to_degrees();
    LongitudeWindow::around(lng, approx.max(exact))
}
