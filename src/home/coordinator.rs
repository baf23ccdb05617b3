use std::{collections::BTreeMap, sync::Arc, time::Duration};

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    config,
    home::{
        group::CompletionGroup,
        result::{AggregationError, AggregationResult},
        seeds::{SEED_GENRE_COUNT, select_seed_genres},
        task::{FetchFailure, FetchTask, Resource, Slot},
    },
    spotify::BrowseApi,
    types::{Album, AudioTrack, Playlist},
    warning,
};

/// Terminal value of one top-level task.
enum SlotOutcome {
    Albums(Result<Vec<Album>, FetchFailure>),
    Playlists(Result<Vec<Playlist>, FetchFailure>),
    Tracks(Result<Vec<AudioTrack>, FetchFailure>),
}

/// Loads the three home feed sections concurrently and joins them.
///
/// ```text
/// new-releases ─────────────────────────────────┐
/// featured-playlists ───────────────────────────┼─> join ─> AggregationResult
/// recommendation-genres ─> recommendations ─────┘
/// ```
///
/// The join counts one signal per branch; the genre request is a stage of
/// the recommendations branch and does not signal on its own. A failing
/// branch never stops its siblings.
pub struct AggregationCoordinator<A: ?Sized> {
    api: Arc<A>,
    deadline: Duration,
    seed_count: usize,
    cancel: CancellationToken,
}

impl<A: BrowseApi + ?Sized + 'static> AggregationCoordinator<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            deadline: Duration::from_secs(config::DEFAULT_HOME_FETCH_TIMEOUT_SECS),
            seed_count: SEED_GENRE_COUNT,
            cancel: CancellationToken::new(),
        }
    }

    /// Branches still running after `deadline` fail with
    /// [`FetchFailure::TimedOut`].
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Number of genre seeds, clamped to the 1..=5 seeds Spotify accepts.
    pub fn with_seed_count(mut self, seed_count: usize) -> Self {
        self.seed_count = seed_count.clamp(1, SEED_GENRE_COUNT);
        self
    }

    /// Token that aborts every in-flight request when cancelled.
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Fetches all sections and resolves once every branch has reached a
    /// terminal state.
    ///
    /// Returns [`AggregationError::PartialFailure`] with the sections that did
    /// load when any branch failed or timed out, and
    /// [`AggregationError::Cancelled`] when the cancel handle fired first.
    pub async fn fetch_all(self) -> Result<AggregationResult, AggregationError> {
        let mut albums = FetchTask::new(Slot::NewReleases);
        let mut playlists = FetchTask::new(Slot::FeaturedPlaylists);
        let mut tracks = FetchTask::new(Slot::Recommendations)
            .with_prerequisite(Resource::RecommendationGenres);

        let mut group = CompletionGroup::new();

        let api = Arc::clone(&self.api);
        group.spawn(Slot::NewReleases, async move {
            SlotOutcome::Albums(api.get_new_releases().await.map_err(FetchFailure::from))
        });

        let api = Arc::clone(&self.api);
        group.spawn(Slot::FeaturedPlaylists, async move {
            SlotOutcome::Playlists(
                api.get_featured_playlists()
                    .await
                    .map_err(FetchFailure::from),
            )
        });

        let api = Arc::clone(&self.api);
        let seed_count = self.seed_count;
        group.spawn(Slot::Recommendations, async move {
            SlotOutcome::Tracks(fetch_recommendations(api.as_ref(), seed_count).await)
        });

        let outcome = group
            .wait(Instant::now() + self.deadline, &self.cancel)
            .await;

        if outcome.cancelled {
            return Err(AggregationError::Cancelled);
        }

        for (slot, signal) in outcome.completed {
            match signal {
                Ok(SlotOutcome::Albums(res)) => albums.settle(res),
                Ok(SlotOutcome::Playlists(res)) => playlists.settle(res),
                Ok(SlotOutcome::Tracks(res)) => tracks.settle(res),
                Err(aborted) => {
                    let failure = FetchFailure::Aborted(aborted.to_string());
                    match slot {
                        Slot::NewReleases => albums.settle(Err(failure)),
                        Slot::FeaturedPlaylists => playlists.settle(Err(failure)),
                        Slot::Recommendations => tracks.settle(Err(failure)),
                    }
                }
            }
        }

        let mut failures = BTreeMap::new();
        let result = AggregationResult {
            albums: settle_slot(albums, &mut failures),
            playlists: settle_slot(playlists, &mut failures),
            tracks: settle_slot(tracks, &mut failures),
            failures,
        };

        let missing = result.missing();
        if missing.is_empty() {
            Ok(result)
        } else {
            Err(AggregationError::PartialFailure { missing, result })
        }
    }
}

/// Genre seeds first, then recommendations for a random subset of them.
async fn fetch_recommendations<A: BrowseApi + ?Sized>(
    api: &A,
    seed_count: usize,
) -> Result<Vec<AudioTrack>, FetchFailure> {
    let genres = api
        .get_recommendation_genres()
        .await
        .map_err(|source| FetchFailure::Prerequisite {
            resource: Resource::RecommendationGenres,
            source,
        })?;

    let seeds = {
        let mut rng = rand::rng();
        select_seed_genres(&genres, seed_count, &mut rng)
    };
    if seeds.is_empty() {
        return Err(FetchFailure::NoSeedGenres);
    }

    Ok(api.get_recommendations(&seeds).await?)
}

fn settle_slot<T>(task: FetchTask<T>, failures: &mut BTreeMap<Slot, FetchFailure>) -> Option<T> {
    let slot = task.slot();
    let prerequisite = task.prerequisite();
    match task.into_outcome() {
        Ok(value) => Some(value),
        Err(failure) => {
            match prerequisite {
                Some(resource) => warning!(
                    "Failed to load {} (depends on {}): {}",
                    slot,
                    resource,
                    failure
                ),
                None => warning!("Failed to load {}: {}", slot, failure),
            }
            failures.insert(slot, failure);
            None
        }
    }
}
