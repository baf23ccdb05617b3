//! # Home Feed Module
//!
//! Builds the home screen from three independent Web API resources: new
//! album releases, featured playlists and recommended tracks. The
//! recommendations are a two-stage fetch: the available genre seeds are
//! loaded first and a random subset of them seeds the recommendations
//! request.
//!
//! ## Flow
//!
//! 1. [`AggregationCoordinator::fetch_all`] spawns one task per section into a
//!    [`CompletionGroup`]
//! 2. The group observes exactly one terminal signal per task, bounded by a
//!    deadline and a cancellation token
//! 3. Each task's outcome settles its [`FetchTask`]; failures are logged and
//!    recorded, never propagated to the siblings
//! 4. The settled tasks become an [`AggregationResult`], or an
//!    [`AggregationError::PartialFailure`] carrying the sections that did load
//! 5. [`build_sections`] turns the result into the sections the CLI renders
//!
//! ## Seed Selection
//!
//! [`select_seed_genres`] picks up to [`SEED_GENRE_COUNT`] distinct genres at
//! random. Fewer distinct genres than that simply yields all of them.

mod coordinator;
mod group;
mod result;
mod seeds;
mod sections;
mod task;

pub use coordinator::AggregationCoordinator;
pub use group::{CompletionGroup, GroupOutcome, TaskAborted};
pub use result::{AggregationError, AggregationResult};
pub use seeds::{SEED_GENRE_COUNT, select_seed_genres};
pub use sections::{HomeSection, build_sections};
pub use task::{FetchFailure, FetchTask, Resource, Slot, TaskState};
