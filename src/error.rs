//! Error types for trackmap operations.

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, TrackMapError>;

/// Errors produced by the trackmap pipeline.
#[derive(Error, Debug)]
pub enum TrackMapError {
    /// The dataset payload could not be fetched or is not a valid feature collection.
    #[error("failed to load dataset: {0}")]
    DataLoad(String),

    /// The dataset contains no records, so no timestamp index can be built.
    #[error("dataset contains no records")]
    EmptyDataset,

    /// The dataset minimum measurement is absent or degenerate, radii cannot be computed.
    #[error("invalid minimum measurement for radius scaling: {0}")]
    InvalidScale(f64),

    /// A seek targeted a position outside the timestamp index.
    #[error("position {index} out of range for index of length {len}")]
    OutOfRange { index: usize, len: usize },

    /// A caller-supplied value failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
