//! Snapshot filter: the styled subset of records observed at one instant.

use crate::error::{Result, TrackMapError};
use crate::store::FeatureStore;
use crate::symbology::{Palette, radius_for};
use crate::types::{FixTime, RenderableRecord, SymbologyConfig};

/// Select every renderable record observed exactly at `timestamp`, styled
/// and labeled for the render sink.
///
/// Equality is exact, using the same ordering key as the timestamp index.
/// An instant with no matching records yields an empty vector, not an
/// error. Fails with [`TrackMapError::InvalidScale`] when matches exist but
/// the dataset minimum is degenerate, so no nonsensical radii reach the map.
pub fn select_at(
    store: &FeatureStore,
    timestamp: FixTime,
    config: &SymbologyConfig,
    palette: &Palette,
) -> Result<Vec<RenderableRecord>> {
    let mut selected = Vec::new();

    for record in store.records() {
        if record.observed_at != timestamp {
            continue;
        }
        let (Some(position), Some(measurement)) = (record.position, record.measurement) else {
            continue;
        };

        let min_measurement = store
            .min_measurement()
            .ok_or(TrackMapError::InvalidScale(f64::NAN))?;
        let radius = radius_for(measurement, min_measurement, config)?;
        let color = palette.color_for(record.subject.as_deref()).to_string();

        let subject = record.subject.as_deref().unwrap_or("unnamed");
        let label = format!(
            "{}: {} ({} cm, id {})",
            record.observed_at.format_utc(),
            subject,
            measurement,
            record.id
        );

        selected.push(RenderableRecord {
            id: record.id.clone(),
            subject: record.subject.clone(),
            measurement,
            observed_at: record.observed_at,
            position,
            radius,
            color,
            label,
        });
    }

    Ok(selected)
}
