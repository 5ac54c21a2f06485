//! Proportional-symbol styling: Flannery radius scaling and identity colors.

use crate::error::{Result, TrackMapError};
use crate::store::FeatureStore;
use crate::types::{LegendEntry, SymbologyConfig};
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Fill color for identities the palette does not know.
pub const FALLBACK_COLOR: &str = "#00ff00";

static DEFAULT_COLORS: Lazy<FxHashMap<String, String>> = Lazy::new(|| {
    [
        ("Aristotle", "#ff0000"),
        ("Hamish", "#FFFF00"),
        ("Ryan", "#33FF33"),
        ("Tarlisha", "#660066"),
    ]
    .into_iter()
    .map(|(name, color)| (name.to_string(), color.to_string()))
    .collect()
});

/// Compute a marker radius with Flannery appearance compensation.
///
/// `radius = scale_constant * (measurement / min_measurement) ^ exponent`,
/// so the minimum-valued record draws at exactly `scale_constant`.
///
/// Fails with [`TrackMapError::InvalidScale`] when the dataset minimum is
/// zero, negative, or non-finite; real-world measurement minimums are
/// expected to be positive but the data does not guarantee it.
pub fn radius_for(measurement: f64, min_measurement: f64, config: &SymbologyConfig) -> Result<f64> {
    if !min_measurement.is_finite() || min_measurement <= 0.0 {
        return Err(TrackMapError::InvalidScale(min_measurement));
    }
    if !measurement.is_finite() {
        return Err(TrackMapError::InvalidInput(format!(
            "measurement must be finite, got: {}",
            measurement
        )));
    }

    Ok(config.scale_constant * (measurement / min_measurement).powf(config.exponent))
}

/// Deterministic identity-to-color mapping with a single fallback.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: FxHashMap<String, String>,
    fallback: String,
}

impl Palette {
    /// Empty palette: every identity maps to `fallback`.
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            colors: FxHashMap::default(),
            fallback: fallback.into(),
        }
    }

    /// Assign a color to an identity, replacing any previous assignment.
    pub fn with_color(mut self, identity: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(identity.into(), color.into());
        self
    }

    /// Color for an identity. Total: unknown or absent identities get the
    /// fallback color.
    pub fn color_for(&self, subject: Option<&str>) -> &str {
        subject
            .and_then(|name| self.colors.get(name))
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    /// Legend rows for every known identity, in alphabetical order.
    ///
    /// The label carries the identity's measurement when the store has one
    /// (the first numeric value observed for that identity).
    pub fn legend_entries(&self, store: &FeatureStore) -> Vec<LegendEntry> {
        let mut identities: Vec<&String> = self.colors.keys().collect();
        identities.sort();

        identities
            .into_iter()
            .map(|identity| {
                let measurement = store.records().iter().find_map(|r| {
                    (r.subject.as_deref() == Some(identity.as_str()))
                        .then_some(r.measurement)
                        .flatten()
                });

                let label = match measurement {
                    Some(value) => format!("{}: {}", identity, value),
                    None => identity.clone(),
                };

                LegendEntry {
                    identity: identity.clone(),
                    color: self.colors[identity].clone(),
                    label,
                }
            })
            .collect()
    }
}

impl Default for Palette {
    /// The tracked salt-water crocodiles of the source dataset.
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.clone(),
            fallback: FALLBACK_COLOR.to_string(),
        }
    }
}
