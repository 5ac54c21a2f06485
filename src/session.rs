//! Map session: one loaded dataset plus its playback state.
//!
//! The session is the explicit context object tying the pipeline together:
//! it owns the feature store, the timestamp index, the playback controller,
//! and the styling configuration, and it drives a [`RenderSink`] with
//! exactly one redraw per navigation transition. Dataset state is replaced
//! wholesale on reload, never mutated in place.

use crate::error::{Result, TrackMapError};
use crate::playback::{Command, PlaybackController};
use crate::render::RenderSink;
use crate::snapshot::select_at;
use crate::store::FeatureStore;
use crate::symbology::Palette;
use crate::timeline::TimestampIndex;
use crate::types::{FixTime, SessionConfig, SymbologyConfig};
use std::path::PathBuf;

/// Proof of a requested reload. Only the most recently issued ticket can
/// commit; earlier tickets are discarded, so a slow stale load can never
/// overwrite the state of a faster, later-requested one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// What happens to the playback position when a reload commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PositionPolicy {
    /// Start over at position 0.
    #[default]
    Reset,
    /// Keep the current position, clamped into the new index bounds.
    Retain,
}

/// Builder for session configuration and the initial dataset load.
#[derive(Debug, Default)]
pub struct SessionBuilder {
    config: SessionConfig,
    palette: Palette,
    payload: Option<String>,
    path: Option<PathBuf>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the full session configuration.
    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Override just the symbol scaling.
    pub fn symbology(mut self, symbology: SymbologyConfig) -> Self {
        self.config = self.config.with_symbology(symbology);
        self
    }

    /// Override the identity color palette.
    pub fn palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Load the dataset from an in-memory GeoJSON payload.
    pub fn geojson(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self.path = None;
        self
    }

    /// Load the dataset from a file on disk.
    pub fn dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self.payload = None;
        self
    }

    /// Build the session: validate configuration, load the dataset, derive
    /// the timestamp index, and start playback at position 0.
    pub fn build(self) -> Result<Session> {
        self.config
            .validate()
            .map_err(TrackMapError::InvalidInput)?;

        let store = match (&self.payload, &self.path) {
            (Some(payload), _) => FeatureStore::from_geojson(payload)?,
            (None, Some(path)) => FeatureStore::from_path(path)?,
            (None, None) => {
                return Err(TrackMapError::InvalidInput(
                    "no dataset source configured".to_string(),
                ));
            }
        };

        let index = TimestampIndex::build(&store)?;
        let playback = PlaybackController::new(index.len());

        Ok(Session {
            config: self.config,
            palette: self.palette,
            store,
            index,
            playback,
            issued_loads: 0,
        })
    }
}

/// One dataset's rendering session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    palette: Palette,
    store: FeatureStore,
    index: TimestampIndex,
    playback: PlaybackController,
    issued_loads: u64,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn store(&self) -> &FeatureStore {
        &self.store
    }

    pub fn index(&self) -> &TimestampIndex {
        &self.index
    }

    /// Current playback position within the timestamp index.
    pub fn position(&self) -> Option<usize> {
        self.playback.position()
    }

    /// Number of distinct timestamps; a slider covers `0..=count - 1`.
    pub fn timestamp_count(&self) -> usize {
        self.index.len()
    }

    /// The instant currently selected for display.
    pub fn current_timestamp(&self) -> Option<FixTime> {
        self.position().and_then(|p| self.index.get(p))
    }

    /// Wire a sink to this session: base layer, legend, and the snapshot at
    /// the current position.
    pub fn attach<S: RenderSink>(&self, sink: &mut S) -> Result<()> {
        sink.set_base_layer(&self.config.tile_source);
        sink.add_legend(&self.palette.legend_entries(&self.store));
        self.redraw(sink)
    }

    /// Dispatch a navigation command, then redraw.
    ///
    /// Exactly one redraw per successful dispatch; a rejected seek changes
    /// neither the position nor the displayed markers.
    pub fn dispatch<S: RenderSink>(&mut self, command: Command, sink: &mut S) -> Result<()> {
        self.playback.apply(command)?;
        self.redraw(sink)
    }

    /// Replace the sink's markers with the snapshot at the current position.
    ///
    /// Selection is computed before the sink is touched, so a styling error
    /// leaves the previously displayed markers visible.
    pub fn redraw<S: RenderSink>(&self, sink: &mut S) -> Result<()> {
        let selected = match self.current_timestamp() {
            Some(timestamp) => {
                select_at(&self.store, timestamp, &self.config.symbology, &self.palette)?
            }
            None => Vec::new(),
        };

        sink.clear_markers();
        sink.add_markers(&selected);
        Ok(())
    }

    /// Announce an incoming reload and get the ticket that may commit it.
    pub fn begin_reload(&mut self) -> LoadTicket {
        self.issued_loads += 1;
        LoadTicket(self.issued_loads)
    }

    /// Commit a fetched payload against a ticket.
    ///
    /// Returns `Ok(false)` when the ticket is stale (a newer reload was
    /// requested since): the payload is discarded and state is untouched.
    /// A payload that fails to parse, or an empty dataset, also leaves the
    /// previous store, index, and position intact.
    pub fn commit_reload(
        &mut self,
        ticket: LoadTicket,
        payload: &str,
        policy: PositionPolicy,
    ) -> Result<bool> {
        if ticket.0 != self.issued_loads {
            log::warn!(
                "discarding stale dataset load (ticket {}, latest {})",
                ticket.0,
                self.issued_loads
            );
            return Ok(false);
        }

        let store = FeatureStore::from_geojson(payload)?;
        let index = TimestampIndex::build(&store)?;

        let mut playback = PlaybackController::new(index.len());
        if policy == PositionPolicy::Retain {
            if let Some(previous) = self.playback.position() {
                let target = previous.min(index.len() - 1);
                if target != previous {
                    log::debug!(
                        "retained position {} clamped to {} for shorter index",
                        previous,
                        target
                    );
                }
                playback.seek(target)?;
            }
        }

        self.store = store;
        self.index = index;
        self.playback = playback;
        Ok(true)
    }

    /// Synchronous reload convenience: issue a ticket, commit the payload,
    /// and redraw (legend included, since identities may have changed).
    pub fn reload<S: RenderSink>(
        &mut self,
        payload: &str,
        policy: PositionPolicy,
        sink: &mut S,
    ) -> Result<()> {
        let ticket = self.begin_reload();
        self.commit_reload(ticket, payload, policy)?;
        sink.add_legend(&self.palette.legend_entries(&self.store));
        self.redraw(sink)
    }
}
