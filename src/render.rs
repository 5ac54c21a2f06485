//! Render sink abstraction for the map surface.
//!
//! The actual map (tile layer, markers, popups, legend box) lives outside
//! this crate. Anything that can draw a set of styled point markers
//! implements [`RenderSink`]; the session drives it with full-replace
//! semantics, never diffs.

use crate::types::{LegendEntry, RenderableRecord};

/// Trait for map surface implementations.
///
/// The session's redraw step calls `clear_markers` then `add_markers`, so a
/// sink shows at most one marker set at a time.
pub trait RenderSink {
    /// Install the base tile layer. Called once when a session attaches.
    fn set_base_layer(&mut self, tile_source: &str);

    /// Remove every currently displayed marker.
    fn clear_markers(&mut self);

    /// Display a set of styled markers.
    fn add_markers(&mut self, markers: &[RenderableRecord]);

    /// Render the legend. Called once per dataset load.
    fn add_legend(&mut self, entries: &[LegendEntry]);
}

/// In-memory sink that records what a real map would display.
///
/// Used in tests and headless runs to observe the pipeline's output.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    base_layer: Option<String>,
    markers: Vec<RenderableRecord>,
    legend: Vec<LegendEntry>,
    redraws: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base_layer(&self) -> Option<&str> {
        self.base_layer.as_deref()
    }

    /// The marker set currently visible.
    pub fn markers(&self) -> &[RenderableRecord] {
        &self.markers
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }

    /// Number of completed clear-then-add cycles.
    pub fn redraws(&self) -> usize {
        self.redraws
    }
}

impl RenderSink for MemorySink {
    fn set_base_layer(&mut self, tile_source: &str) {
        self.base_layer = Some(tile_source.to_string());
    }

    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_markers(&mut self, markers: &[RenderableRecord]) {
        self.markers.extend_from_slice(markers);
        self.redraws += 1;
    }

    fn add_legend(&mut self, entries: &[LegendEntry]) {
        self.legend = entries.to_vec();
    }
}

/// Sink that logs drawing instructions instead of displaying them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl RenderSink for LogSink {
    fn set_base_layer(&mut self, tile_source: &str) {
        log::info!("base layer: {}", tile_source);
    }

    fn clear_markers(&mut self) {
        log::debug!("clear markers");
    }

    fn add_markers(&mut self, markers: &[RenderableRecord]) {
        for marker in markers {
            log::info!(
                "marker at ({:.5}, {:.5}) r={:.2} {}: {}",
                marker.position.x(),
                marker.position.y(),
                marker.radius,
                marker.color,
                marker.label
            );
        }
    }

    fn add_legend(&mut self, entries: &[LegendEntry]) {
        for entry in entries {
            log::info!("legend {} {}", entry.color, entry.label);
        }
    }
}
