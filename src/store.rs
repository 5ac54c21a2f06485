//! Feature store: parsed, validated observation records for one dataset.
//!
//! The store is immutable after load. Per-record problems (non-numeric
//! measurement, invalid coordinates) are absorbed here: such records stay in
//! the store but are excluded from aggregation and rendering. Dataset-level
//! problems (unreadable source, payload that is not a feature collection)
//! fail the load.

use crate::error::{Result, TrackMapError};
use crate::types::{FixTime, ObservationRecord};
use crate::validate::{is_valid_measurement, position_from_coords};
use geojson::{Feature, GeoJson, Value};
use std::fs;
use std::path::Path;

/// Property key for the attribute driving symbol size.
pub const MEASUREMENT_KEY: &str = "total length (cm)";
/// Property key for the tracked animal's identity.
pub const SUBJECT_KEY: &str = "croc name";
/// Property key for the observation timestamp.
pub const TIME_KEY: &str = "GPS Fix Time";
/// Property key for the source object identifier.
pub const ID_KEY: &str = "OBJECTID";

/// Immutable collection of observation records for one dataset version.
#[derive(Debug, Clone)]
pub struct FeatureStore {
    records: Vec<ObservationRecord>,
    min_measurement: Option<f64>,
}

impl FeatureStore {
    /// Parse a GeoJSON feature collection payload into a store.
    ///
    /// Fails when the payload is not valid GeoJSON or not a feature
    /// collection. Records missing a usable timestamp are skipped with a
    /// warning; other per-record problems degrade the record instead.
    pub fn from_geojson(payload: &str) -> Result<Self> {
        let geojson: GeoJson = payload
            .parse()
            .map_err(|e| TrackMapError::DataLoad(format!("failed to parse GeoJSON: {}", e)))?;

        let collection = match geojson {
            GeoJson::FeatureCollection(fc) => fc,
            other => {
                return Err(TrackMapError::DataLoad(format!(
                    "expected a FeatureCollection, got {}",
                    geojson_kind(&other)
                )));
            }
        };

        let total = collection.features.len();
        let mut records = Vec::with_capacity(total);

        for (index, feature) in collection.features.into_iter().enumerate() {
            if let Some(record) = parse_feature(feature, index) {
                records.push(record);
            }
        }

        let min_measurement = records
            .iter()
            .filter_map(|r| r.measurement)
            .fold(None, |min: Option<f64>, value| {
                Some(min.map_or(value, |m| m.min(value)))
            });

        log::debug!(
            "loaded {} of {} features (min measurement: {:?})",
            records.len(),
            total,
            min_measurement
        );

        Ok(Self {
            records,
            min_measurement,
        })
    }

    /// Load a feature collection from a file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path)?;

        Self::from_geojson(&payload).map_err(|e| match e {
            TrackMapError::DataLoad(msg) => {
                TrackMapError::DataLoad(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn records(&self) -> &[ObservationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Minimum over all numeric measurements, computed once at load.
    /// `None` when no record carries a numeric measurement.
    pub fn min_measurement(&self) -> Option<f64> {
        self.min_measurement
    }

    /// Number of records with both a valid position and a numeric measurement.
    pub fn renderable_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_renderable()).count()
    }
}

fn parse_feature(feature: Feature, index: usize) -> Option<ObservationRecord> {
    let properties = feature.properties.unwrap_or_default();

    let observed_at = match properties.get(TIME_KEY).and_then(FixTime::from_property) {
        Some(t) => t,
        None => {
            log::warn!(
                "skipping feature {}: missing or unreadable {:?} property",
                index,
                TIME_KEY
            );
            return None;
        }
    };

    let id = properties
        .get(ID_KEY)
        .and_then(property_as_id)
        .or_else(|| feature.id.as_ref().map(feature_id_to_string))
        .unwrap_or_else(|| index.to_string());

    let subject = properties
        .get(SUBJECT_KEY)
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    let measurement = match properties.get(MEASUREMENT_KEY).and_then(|v| v.as_f64()) {
        Some(value) if is_valid_measurement(value) => Some(value),
        _ => {
            log::warn!(
                "feature {} ({}): no numeric {:?} value, excluded from scaling",
                index,
                id,
                MEASUREMENT_KEY
            );
            None
        }
    };

    let position = match feature.geometry.map(|g| g.value) {
        Some(Value::Point(coords)) if coords.len() >= 2 => {
            let position = position_from_coords(coords[0], coords[1]);
            if position.is_none() {
                log::warn!(
                    "feature {} ({}): invalid coordinates [{}, {}], not renderable",
                    index,
                    id,
                    coords[0],
                    coords[1]
                );
            }
            position
        }
        _ => {
            log::warn!("feature {} ({}): no point geometry, not renderable", index, id);
            None
        }
    };

    Some(ObservationRecord {
        id,
        subject,
        measurement,
        observed_at,
        position,
    })
}

fn property_as_id(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

fn feature_id_to_string(id: &geojson::feature::Id) -> String {
    match id {
        geojson::feature::Id::String(s) => s.clone(),
        geojson::feature::Id::Number(n) => n.to_string(),
    }
}

fn geojson_kind(geojson: &GeoJson) -> &'static str {
    match geojson {
        GeoJson::Geometry(_) => "a bare Geometry",
        GeoJson::Feature(_) => "a single Feature",
        GeoJson::FeatureCollection(_) => "a FeatureCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature_json(id: u64, name: &str, length: f64, time: i64, lon: f64, lat: f64) -> String {
        format!(
            r#"{{
                "type": "Feature",
                "geometry": {{ "type": "Point", "coordinates": [{lon}, {lat}] }},
                "properties": {{
                    "OBJECTID": {id},
                    "croc name": "{name}",
                    "total length (cm)": {length},
                    "GPS Fix Time": {time}
                }}
            }}"#
        )
    }

    fn collection(features: &[String]) -> String {
        format!(
            r#"{{ "type": "FeatureCollection", "features": [{}] }}"#,
            features.join(",")
        )
    }

    #[test]
    fn test_min_measurement() {
        let payload = collection(&[
            feature_json(1, "Aristotle", 3955.0, 100, 142.0, -12.0),
            feature_json(2, "Hamish", 3890.0, 200, 142.1, -12.1),
            feature_json(3, "Ryan", 4505.0, 300, 142.2, -12.2),
            feature_json(4, "Tarlisha", 3266.0, 400, 142.3, -12.3),
        ]);

        let store = FeatureStore::from_geojson(&payload).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.min_measurement(), Some(3266.0));
    }

    #[test]
    fn test_non_numeric_measurement_retained_but_excluded() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [142.0, -12.0] },
                    "properties": {
                        "OBJECTID": 1,
                        "croc name": "Aristotle",
                        "total length (cm)": "unknown",
                        "GPS Fix Time": 100
                    }
                },
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [142.1, -12.1] },
                    "properties": {
                        "OBJECTID": 2,
                        "croc name": "Tarlisha",
                        "total length (cm)": 3266,
                        "GPS Fix Time": 100
                    }
                }
            ]
        }"#;

        let store = FeatureStore::from_geojson(payload).unwrap();
        // Both records survive, only the numeric one feeds the minimum.
        assert_eq!(store.len(), 2);
        assert_eq!(store.min_measurement(), Some(3266.0));
        assert_eq!(store.renderable_count(), 1);
        assert!(store.records()[0].measurement.is_none());
    }

    #[test]
    fn test_invalid_coordinates_not_renderable() {
        let payload = collection(&[
            feature_json(1, "Ryan", 4505.0, 100, 999.0, -12.0),
            feature_json(2, "Ryan", 4505.0, 200, 142.0, -12.0),
        ]);

        let store = FeatureStore::from_geojson(&payload).unwrap();
        assert_eq!(store.len(), 2);
        assert!(store.records()[0].position.is_none());
        assert!(store.records()[1].position.is_some());
        assert_eq!(store.renderable_count(), 1);
    }

    #[test]
    fn test_missing_timestamp_skips_record() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [142.0, -12.0] },
                    "properties": { "OBJECTID": 1, "total length (cm)": 3266 }
                }
            ]
        }"#;

        let store = FeatureStore::from_geojson(payload).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.min_measurement(), None);
    }

    #[test]
    fn test_missing_subject_is_allowed() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [142.0, -12.0] },
                    "properties": {
                        "OBJECTID": 7,
                        "total length (cm)": 3000,
                        "GPS Fix Time": 100
                    }
                }
            ]
        }"#;

        let store = FeatureStore::from_geojson(payload).unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.records()[0].subject.is_none());
        assert!(store.records()[0].is_renderable());
    }

    #[test]
    fn test_rejects_non_collection() {
        let payload = r#"{ "type": "Point", "coordinates": [142.0, -12.0] }"#;
        let err = FeatureStore::from_geojson(payload).unwrap_err();
        assert!(matches!(err, TrackMapError::DataLoad(_)));

        let err = FeatureStore::from_geojson("not json at all").unwrap_err();
        assert!(matches!(err, TrackMapError::DataLoad(_)));
    }

    #[test]
    fn test_empty_collection_loads() {
        let payload = r#"{ "type": "FeatureCollection", "features": [] }"#;
        let store = FeatureStore::from_geojson(payload).unwrap();
        assert!(store.is_empty());
        assert_eq!(store.min_measurement(), None);
    }

    #[test]
    fn test_string_timestamps() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "Point", "coordinates": [142.0, -12.0] },
                    "properties": {
                        "OBJECTID": 1,
                        "croc name": "Hamish",
                        "total length (cm)": 3890,
                        "GPS Fix Time": "2020-09-13T12:26:40Z"
                    }
                }
            ]
        }"#;

        let store = FeatureStore::from_geojson(payload).unwrap();
        assert_eq!(
            store.records()[0].observed_at,
            FixTime::from_millis(1_600_000_000_000)
        );
    }
}
