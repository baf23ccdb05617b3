use std::collections::{BTreeMap, BTreeSet};

use crate::{
    home::task::{FetchFailure, Slot},
    types::{Album, AudioTrack, Playlist},
};

/// The consolidated home feed.
///
/// A slot is `None` exactly when its task failed; the reason is kept in
/// `failures`.
#[derive(Debug, Default)]
pub struct AggregationResult {
    pub albums: Option<Vec<Album>>,
    pub playlists: Option<Vec<Playlist>>,
    pub tracks: Option<Vec<AudioTrack>>,
    pub failures: BTreeMap<Slot, FetchFailure>,
}

impl AggregationResult {
    pub fn missing(&self) -> BTreeSet<Slot> {
        let mut missing = BTreeSet::new();
        if self.albums.is_none() {
            missing.insert(Slot::NewReleases);
        }
        if self.playlists.is_none() {
            missing.insert(Slot::FeaturedPlaylists);
        }
        if self.tracks.is_none() {
            missing.insert(Slot::Recommendations);
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing().is_empty()
    }

    pub fn failure(&self, slot: Slot) -> Option<&FetchFailure> {
        self.failures.get(&slot)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AggregationError {
    /// Some sections could not be loaded. The sections that did load are in
    /// `result`.
    #[error("home feed incomplete, missing {}", join_slots(.missing))]
    PartialFailure {
        missing: BTreeSet<Slot>,
        result: AggregationResult,
    },
    #[error("loading the home feed was cancelled")]
    Cancelled,
}

impl AggregationError {
    /// The partially populated result, if there is one.
    pub fn into_partial(self) -> Option<AggregationResult> {
        match self {
            AggregationError::PartialFailure { result, .. } => Some(result),
            AggregationError::Cancelled => None,
        }
    }
}

fn join_slots(slots: &BTreeSet<Slot>) -> String {
    slots
        .iter()
        .map(Slot::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
