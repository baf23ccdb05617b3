use std::fmt;

use crate::spotify::ApiError;

/// A section of the home feed, one per top-level fetch task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    NewReleases,
    FeaturedPlaylists,
    Recommendations,
}

impl Slot {
    pub const ALL: [Slot; 3] = [
        Slot::NewReleases,
        Slot::FeaturedPlaylists,
        Slot::Recommendations,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Slot::NewReleases => "New Released Albums",
            Slot::FeaturedPlaylists => "Featured Playlists",
            Slot::Recommendations => "Recommended",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Slot::NewReleases => "new releases",
            Slot::FeaturedPlaylists => "featured playlists",
            Slot::Recommendations => "recommendations",
        })
    }
}

/// A remote resource read while building the home feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    NewReleases,
    FeaturedPlaylists,
    RecommendationGenres,
    Recommendations,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::NewReleases => "new-releases",
            Resource::FeaturedPlaylists => "featured-playlists",
            Resource::RecommendationGenres => "recommendation-genres",
            Resource::Recommendations => "recommendations",
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum FetchFailure {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("prerequisite {resource} failed: {source}")]
    Prerequisite {
        resource: Resource,
        #[source]
        source: ApiError,
    },
    #[error("no genre seeds available")]
    NoSeedGenres,
    #[error("timed out")]
    TimedOut,
    #[error("aborted: {0}")]
    Aborted(String),
}

#[derive(Debug)]
pub enum TaskState<T> {
    Pending,
    Succeeded(T),
    Failed(FetchFailure),
}

impl<T> TaskState<T> {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskState::Pending)
    }
}

/// One outstanding unit of work of the home feed.
///
/// `prerequisite` names the resource that has to be fetched before this
/// task's own request can be issued.
#[derive(Debug)]
pub struct FetchTask<T> {
    slot: Slot,
    prerequisite: Option<Resource>,
    state: TaskState<T>,
}

impl<T> FetchTask<T> {
    pub fn new(slot: Slot) -> Self {
        Self {
            slot,
            prerequisite: None,
            state: TaskState::Pending,
        }
    }

    pub fn with_prerequisite(mut self, resource: Resource) -> Self {
        self.prerequisite = Some(resource);
        self
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    pub fn prerequisite(&self) -> Option<Resource> {
        self.prerequisite
    }

    pub fn state(&self) -> &TaskState<T> {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        !self.state.is_terminal()
    }

    /// Records the terminal outcome. A task settles once; later outcomes
    /// are dropped.
    pub fn settle(&mut self, outcome: Result<T, FetchFailure>) {
        if self.state.is_terminal() {
            return;
        }

        self.state = match outcome {
            Ok(value) => TaskState::Succeeded(value),
            Err(failure) => TaskState::Failed(failure),
        };
    }

    /// Consumes the task. A task that never settled counts as timed out.
    pub fn into_outcome(self) -> Result<T, FetchFailure> {
        match self.state {
            TaskState::Succeeded(value) => Ok(value),
            TaskState::Failed(failure) => Err(failure),
            TaskState::Pending => Err(FetchFailure::TimedOut),
        }
    }
}
