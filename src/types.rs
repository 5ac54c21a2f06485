//! Core types and configuration for trackmap.
//!
//! Record types flowing through the pipeline plus the serializable
//! configuration surface for symbology and the map session.

use chrono::{DateTime, SecondsFormat, Utc};
use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observation timestamp, normalized to epoch milliseconds.
///
/// Source data carries `GPS Fix Time` as an epoch-like number or string.
/// Normalizing to milliseconds gives one total order for the timestamp
/// index and exact equality for snapshot selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FixTime(i64);

impl FixTime {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn millis(&self) -> i64 {
        self.0
    }

    /// Interpret a raw JSON property value as a timestamp.
    ///
    /// Accepts epoch-millisecond numbers, integer strings, and RFC 3339
    /// datetimes. Returns `None` for anything else.
    pub fn from_property(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Number(n) => {
                if let Some(millis) = n.as_i64() {
                    Some(Self(millis))
                } else {
                    n.as_f64()
                        .filter(|f| f.is_finite())
                        .map(|f| Self(f as i64))
                }
            }
            serde_json::Value::String(s) => {
                let s = s.trim();
                if let Ok(millis) = s.parse::<i64>() {
                    return Some(Self(millis));
                }
                DateTime::parse_from_rfc3339(s)
                    .ok()
                    .map(|dt| Self(dt.timestamp_millis()))
            }
            _ => None,
        }
    }

    /// Human-readable UTC rendering used in marker labels.
    pub fn format_utc(&self) -> String {
        match DateTime::<Utc>::from_timestamp_millis(self.0) {
            Some(dt) => dt.to_rfc3339_opts(SecondsFormat::Secs, true),
            None => format!("@{}ms", self.0),
        }
    }
}

impl fmt::Display for FixTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_utc())
    }
}

/// One GPS fix of a tracked animal, as parsed from the source collection.
///
/// Records with a missing or non-numeric measurement, or with invalid
/// coordinates, are retained here but excluded from aggregation and
/// rendering respectively.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationRecord {
    /// Source object identifier, normalized to a string.
    pub id: String,
    /// Tracked animal identity; may be absent in the source data.
    pub subject: Option<String>,
    /// Attribute value driving symbol size (e.g. total length in cm).
    /// `None` when the source value is missing or non-numeric.
    pub measurement: Option<f64>,
    pub observed_at: FixTime,
    /// Geographic position; `None` when the source coordinates are invalid.
    pub position: Option<Point>,
}

impl ObservationRecord {
    /// A record can be drawn only with a valid position and a numeric measurement.
    pub fn is_renderable(&self) -> bool {
        self.position.is_some() && self.measurement.is_some()
    }
}

/// A styled, draw-ready marker for one observation at the selected instant.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableRecord {
    pub id: String,
    pub subject: Option<String>,
    pub measurement: f64,
    pub observed_at: FixTime,
    pub position: Point,
    /// Symbol radius from the Flannery formula.
    pub radius: f64,
    /// CSS hex fill color for the marker.
    pub color: String,
    /// Display label: formatted time plus identity, size, and id.
    pub label: String,
}

/// One legend row: identity, its color, and a display label.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub identity: String,
    pub color: String,
    pub label: String,
}

/// Proportional-symbol scaling configuration.
///
/// Radius formula: `scale_constant * (measurement / min_measurement) ^ exponent`
/// (Flannery appearance compensation). The original map variants disagreed on
/// both constants, so they are configuration here rather than code.
///
/// # Example
///
/// ```rust
/// use trackmap::SymbologyConfig;
///
/// let json = r#"{ "scale_constant": 4.5, "exponent": 6.0 }"#;
/// let config = SymbologyConfig::from_json(json).unwrap();
/// assert_eq!(config.scale_constant, 4.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymbologyConfig {
    /// Radius of a minimum-valued symbol (ratio 1 maps to exactly this).
    #[serde(default = "SymbologyConfig::default_scale_constant")]
    pub scale_constant: f64,

    /// Power applied to the measurement ratio.
    #[serde(default = "SymbologyConfig::default_exponent")]
    pub exponent: f64,
}

impl SymbologyConfig {
    const fn default_scale_constant() -> f64 {
        4.5
    }

    // Flannery's perceptual compensation exponent.
    const fn default_exponent() -> f64 {
        0.57
    }

    pub fn with_scale_constant(mut self, scale_constant: f64) -> Self {
        self.scale_constant = scale_constant;
        self
    }

    pub fn with_exponent(mut self, exponent: f64) -> Self {
        self.exponent = exponent;
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if !self.scale_constant.is_finite() || self.scale_constant <= 0.0 {
            return Err(format!(
                "Scale constant must be finite and positive, got: {}",
                self.scale_constant
            ));
        }
        if !self.exponent.is_finite() {
            return Err(format!("Exponent must be finite, got: {}", self.exponent));
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        use serde::de::Error;

        let config: SymbologyConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from a TOML string (requires toml feature).
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        use serde::de::Error;

        let config: SymbologyConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as a TOML string (requires toml feature).
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

impl Default for SymbologyConfig {
    fn default() -> Self {
        Self {
            scale_constant: Self::default_scale_constant(),
            exponent: Self::default_exponent(),
        }
    }
}

/// Session-level configuration: base layer plus symbol scaling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Tile source handed to the render sink's base layer.
    #[serde(default = "SessionConfig::default_tile_source")]
    pub tile_source: String,

    #[serde(default)]
    pub symbology: SymbologyConfig,
}

impl SessionConfig {
    fn default_tile_source() -> String {
        "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            .to_string()
    }

    pub fn with_tile_source(mut self, tile_source: impl Into<String>) -> Self {
        self.tile_source = tile_source.into();
        self
    }

    pub fn with_symbology(mut self, symbology: SymbologyConfig) -> Self {
        self.symbology = symbology;
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.tile_source.is_empty() {
            return Err("Tile source must not be empty".to_string());
        }
        self.symbology.validate()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tile_source: Self::default_tile_source(),
            symbology: SymbologyConfig::default(),
        }
    }
}
