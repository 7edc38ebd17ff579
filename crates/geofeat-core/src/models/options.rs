use serde::{Deserialize, Serialize};

/// Default length of one degree of latitude on the reference sphere, in kilometers
pub const KM_PER_DEGREE: f64 = 111.045;

/// How the WKT decoder treats a body whose nesting does not match its type keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValidityMode {
    /// Reject the geometry with an error
    Strict,
    /// Replace the offending piece with an empty sequence
    #[default]
    Lenient,
}

/// Axis order expected by the consuming client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AxisOrder {
    /// `[longitude, latitude]`, as GeoJSON and WKT store it
    #[default]
    LngLat,
    /// `[latitude, longitude]`, as Leaflet uses internally
    LatLng,
}

impl AxisOrder {
    pub fn needs_reversal(&self) -> bool {
        matches!(self, AxisOrder::LatLng)
    }
}

/// Runtime switches for the geometry codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CodecOptions {
    pub validity: ValidityMode,

    /// Emit `"<TYPE> not implemented"` instead of failing on unknown geometry types
    pub legacy_markers: bool,
}

impl CodecOptions {
    pub fn strict() -> Self {
        Self { validity: ValidityMode::Strict, ..Default::default() }
    }

    pub fn is_strict(&self) -> bool {
        self.validity == ValidityMode::Strict
    }

    pub fn with_legacy_markers(mut self, enabled: bool) -> Self {
        self.legacy_markers = enabled;
        self
    }
}
