//! Time-sliced proportional-symbol pipeline for GPS tracking data.
//!
//! Turns a GeoJSON feature collection of location observations into styled,
//! time-filterable map snapshots: symbol radii follow Flannery appearance
//! compensation, colors follow a configurable identity palette, and a
//! playback controller steps or seeks through the distinct observation
//! times, driving any [`RenderSink`] with full-replace redraws.
//!
//! ```rust
//! use trackmap::{Command, MemorySink, Session};
//!
//! let payload = r#"{
//!     "type": "FeatureCollection",
//!     "features": [
//!         {
//!             "type": "Feature",
//!             "geometry": { "type": "Point", "coordinates": [142.0, -12.0] },
//!             "properties": {
//!                 "OBJECTID": 1,
//!                 "croc name": "Ryan",
//!                 "total length (cm)": 4505,
//!                 "GPS Fix Time": 1600000000000
//!             }
//!         },
//!         {
//!             "type": "Feature",
//!             "geometry": { "type": "Point", "coordinates": [142.1, -12.1] },
//!             "properties": {
//!                 "OBJECTID": 2,
//!                 "croc name": "Tarlisha",
//!                 "total length (cm)": 3266,
//!                 "GPS Fix Time": 1600000300000
//!             }
//!         }
//!     ]
//! }"#;
//!
//! let mut session = Session::builder().geojson(payload).build()?;
//! let mut sink = MemorySink::new();
//!
//! session.attach(&mut sink)?;
//! assert_eq!(sink.markers().len(), 1);
//!
//! session.dispatch(Command::StepForward, &mut sink)?;
//! assert_eq!(sink.markers()[0].subject.as_deref(), Some("Tarlisha"));
//! # Ok::<(), trackmap::TrackMapError>(())
//! ```

pub mod error;
pub mod playback;
pub mod render;
pub mod session;
pub mod snapshot;
pub mod store;
pub mod symbology;
pub mod timeline;
pub mod types;
pub mod validate;

pub use error::{Result, TrackMapError};

pub use geo::Point;

pub use playback::{Command, PlaybackController};
pub use render::{LogSink, MemorySink, RenderSink};
pub use session::{LoadTicket, PositionPolicy, Session, SessionBuilder};
pub use snapshot::select_at;
pub use store::FeatureStore;
pub use symbology::{FALLBACK_COLOR, Palette, radius_for};
pub use timeline::TimestampIndex;
pub use types::{
    FixTime, LegendEntry, ObservationRecord, RenderableRecord, SessionConfig, SymbologyConfig,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {

    pub use crate::{Result, Session, SessionBuilder, TrackMapError};

    pub use geo::Point;

    pub use crate::{Command, PlaybackController};

    pub use crate::{FixTime, SessionConfig, SymbologyConfig};

    pub use crate::{FeatureStore, TimestampIndex};

    pub use crate::{MemorySink, RenderSink};

    pub use crate::{Palette, radius_for, select_at};
}
