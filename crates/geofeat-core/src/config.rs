use crate::error::{GeofeatError, Result};
use crate::models::options::{AxisOrder, CodecOptions, ValidityMode, KM_PER_DEGREE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
    /// Provided via CLI argument
    Cli,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
            ConfigSource::Cli => 3,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration for the codec and planner
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    pub wkt_validity: ConfigValue<ValidityMode>,
    pub legacy_markers: ConfigValue<bool>,
    pub km_per_degree: ConfigValue<f64>,
    pub axis_order: ConfigValue<AxisOrder>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            wkt_validity: ConfigValue::new(ValidityMode::Lenient, ConfigSource::Default),
            legacy_markers: ConfigValue::new(false, ConfigSource::Default),
            km_per_degree: ConfigValue::new(KM_PER_DEGREE, ConfigSource::Default),
            axis_order: ConfigValue::new(AxisOrder::LngLat, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(GeofeatError::ConfigMissing { key: path.display().to_string() });
        }

        let content =
            fs::read_to_string(path).map_err(|e| GeofeatError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to read config file: {}", e),
            })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| GeofeatError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(validity) = file_config.wkt_validity {
            self.wkt_validity.update(validity, ConfigSource::File);
        }

        if let Some(legacy) = file_config.legacy_markers {
            self.legacy_markers.update(legacy, ConfigSource::File);
        }

        if let Some(km) = file_config.km_per_degree {
            self.km_per_degree.update(validate_km_per_degree(km)?, ConfigSource::File);
        }

        if let Some(axis_order) = file_config.axis_order {
            self.axis_order.update(axis_order, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        // GEOFEAT_WKT_VALIDITY
        if let Ok(validity_str) = env::var("GEOFEAT_WKT_VALIDITY") {
            match parse_validity_mode(&validity_str) {
                Ok(validity) => self.wkt_validity.update(validity, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOFEAT_WKT_VALIDITY value '{}': expected strict or lenient",
                    validity_str
                ),
            }
        }

        // GEOFEAT_LEGACY_MARKERS
        if let Ok(legacy_str) = env::var("GEOFEAT_LEGACY_MARKERS") {
            match parse_flag(&legacy_str) {
                Ok(legacy) => self.legacy_markers.update(legacy, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOFEAT_LEGACY_MARKERS value '{}': expected true or false",
                    legacy_str
                ),
            }
        }

        // GEOFEAT_KM_PER_DEGREE
        if let Ok(km_str) = env::var("GEOFEAT_KM_PER_DEGREE") {
            match km_str.parse::<f64>().map_err(|e| e.to_string()).and_then(|km| {
                validate_km_per_degree(km).map_err(|e| e.to_string())
            }) {
                Ok(km) => self.km_per_degree.update(km, ConfigSource::Environment),
                Err(reason) => tracing::warn!(
                    "Invalid GEOFEAT_KM_PER_DEGREE value '{}': {}",
                    km_str,
                    reason
                ),
            }
        }

        // GEOFEAT_AXIS_ORDER
        if let Ok(order_str) = env::var("GEOFEAT_AXIS_ORDER") {
            match parse_axis_order(&order_str) {
                Ok(order) => self.axis_order.update(order, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid GEOFEAT_AXIS_ORDER value '{}': expected lnglat or latlng",
                    order_str
                ),
            }
        }

        self
    }

    /// Update configuration from CLI arguments
    pub fn update_from_cli(&mut self, overrides: CliConfigOverrides) {
        if let Some(validity) = overrides.wkt_validity {
            self.wkt_validity.update(validity, ConfigSource::Cli);
        }

        if let Some(legacy) = overrides.legacy_markers {
            self.legacy_markers.update(legacy, ConfigSource::Cli);
        }

        if let Some(km) = overrides.km_per_degree {
            self.km_per_degree.update(km, ConfigSource::Cli);
        }

        if let Some(axis_order) = overrides.axis_order {
            self.axis_order.update(axis_order, ConfigSource::Cli);
        }
    }

    /// Options for building a geometry codec
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions { validity: self.wkt_validity.value, legacy_markers: self.legacy_markers.value }
    }

    /// Get all configuration values as a map for inspection
    pub fn to_inspection_map(&self) -> HashMap<String, (String, ConfigSource)> {
        let mut map = HashMap::new();

        map.insert(
            "wkt_validity".to_string(),
            (format!("{:?}", self.wkt_validity.value), self.wkt_validity.source),
        );

        map.insert(
            "legacy_markers".to_string(),
            (self.legacy_markers.value.to_string(), self.legacy_markers.source),
        );

        map.insert(
            "km_per_degree".to_string(),
            (self.km_per_degree.value.to_string(), self.km_per_degree.source),
        );

        map.insert(
            "axis_order".to_string(),
            (format!("{:?}", self.axis_order.value), self.axis_order.source),
        );

        map
    }
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Configuration loaded from TOML file
#[derive(Debug, Deserialize, Serialize)]
struct FileConfig {
    wkt_validity: Option<ValidityMode>,
    legacy_markers: Option<bool>,
    km_per_degree: Option<f64>,
    axis_order: Option<AxisOrder>,
}

/// CLI configuration overrides
#[derive(Debug, Default)]
pub struct CliConfigOverrides {
    pub wkt_validity: Option<ValidityMode>,
    pub legacy_markers: Option<bool>,
    pub km_per_degree: Option<f64>,
    pub axis_order: Option<AxisOrder>,
}

/// Parse validity mode from string
pub fn parse_validity_mode(s: &str) -> Result<ValidityMode> {
    match s.to_lowercase().as_str() {
        "strict" => Ok(ValidityMode::Strict),
        "lenient" => Ok(ValidityMode::Lenient),
        _ => Err(GeofeatError::ConfigInvalid {
            key: "wkt_validity".to_string(),
            reason: format!("Invalid validity mode: {}. Use strict or lenient", s),
        }),
    }
}

/// Parse axis order from string
pub fn parse_axis_order(s: &str) -> Result<AxisOrder> {
    match s.to_lowercase().replace(['-', '_', ','], "").as_str() {
        "lnglat" | "lonlat" | "xy" => Ok(AxisOrder::LngLat),
        "latlng" | "latlon" | "yx" => Ok(AxisOrder::LatLng),
        _ => Err(GeofeatError::ConfigInvalid {
            key: "axis_order".to_string(),
            reason: format!("Invalid axis order: {}. Use lnglat or latlng", s),
        }),
    }
}

fn parse_flag(s: &str) -> Result<bool> {
    match s.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(GeofeatError::ConfigInvalid {
            key: "legacy_markers".to_string(),
            reason: format!("Invalid flag: {}. Use true or false", s),
        }),
    }
}

fn validate_km_per_degree(km: f64) -> Result<f64> {
    if km.is_finite() && km > 0.0 {
        Ok(km)
    } else {
        Err(GeofeatError::ConfigInvalid {
            key: "km_per_degree".to_string(),
            reason: format!("must be a positive number, got {}", km),
        })
    }
}
