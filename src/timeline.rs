//! Timestamp index: the distinct, ordered observation times of a dataset.

use crate::error::{Result, TrackMapError};
use crate::store::FeatureStore;
use crate::types::FixTime;
use std::collections::BTreeSet;

/// Duplicate-free ascending sequence of every distinct observation time.
///
/// Built once per dataset load, alongside the store it was derived from.
/// Iteration is restartable: `iter()` can be called any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampIndex {
    timestamps: Vec<FixTime>,
}

impl TimestampIndex {
    /// Derive the index from a store.
    ///
    /// Fails with [`TrackMapError::EmptyDataset`] when the store holds no
    /// records; downstream playback treats that as a terminal no-op state.
    pub fn build(store: &FeatureStore) -> Result<Self> {
        if store.is_empty() {
            return Err(TrackMapError::EmptyDataset);
        }

        let distinct: BTreeSet<FixTime> =
            store.records().iter().map(|r| r.observed_at).collect();

        Ok(Self {
            timestamps: distinct.into_iter().collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<FixTime> {
        self.timestamps.get(position).copied()
    }

    pub fn first(&self) -> Option<FixTime> {
        self.timestamps.first().copied()
    }

    pub fn last(&self) -> Option<FixTime> {
        self.timestamps.last().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = FixTime> + '_ {
        self.timestamps.iter().copied()
    }
}
