//! Error types for geofeat

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeofeatError {
    // WKT errors
    #[error("Unparseable geometry: no recognized WKT type keyword in '{input}'")]
    UnparseableGeometry { input: String },

    #[error("Malformed {geometry_type} body: {reason}")]
    MalformedGeometry {
        geometry_type: String,
        reason: String,
    },

    #[error("Geometry type {type_name} cannot be encoded as WKT")]
    UnsupportedGeometryType { type_name: String },

    // GeoJSON errors
    #[error("Unrecognized {kind} type: {type_name}")]
    UnrecognizedType { kind: String, type_name: String },

    #[error("Feature has no geometry")]
    MissingGeometry,

    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),

    // Proximity errors
    #[error("Unsupported geometry for proximity search: {type_name}. Only single points are accepted")]
    UnsupportedProximityGeometry { type_name: String },

    #[error("Invalid proximity input: {reason}")]
    InvalidProximityInput { reason: String },

    // Configuration errors
    #[error("Configuration file not found: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeofeatError {
    /// Unknown `type` tag on a geometry-shaped value
    pub fn unrecognized_geometry(type_name: impl Into<String>) -> Self {
        Self::UnrecognizedType { kind: "geometry".to_string(), type_name: type_name.into() }
    }

    /// Unknown `type` tag on a feature-shaped value
    pub fn unrecognized_feature(type_name: impl Into<String>) -> Self {
        Self::UnrecognizedType { kind: "feature".to_string(), type_name: type_name.into() }
    }

    /// Whether a record layer should skip the attribute instead of failing the record.
    pub fn is_skippable(&self) -> bool {
        matches!(
            self,
            GeofeatError::UnrecognizedType { .. }
                | GeofeatError::MissingGeometry
                | GeofeatError::GeoJson(_)
        )
    }
}

impl From<serde_json::Error> for GeofeatError {
    fn from(e: serde_json::Error) -> Self {
        GeofeatError::GeoJson(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeofeatError>;
