//! # CLI Module
//!
//! The command-line layer of sporlfeed. Each command loads what it needs
//! (token cache, configuration), calls into the library and renders the
//! outcome as colored status lines and tables.
//!
//! ## Commands
//!
//! - [`auth`] - PKCE sign-in through the browser and the local redirect server
//! - [`home`] - loads new releases, featured playlists and recommendations
//!   concurrently and prints every section that loaded
//! - [`search`] - catalog search
//! - [`playlists`] / [`add_to_playlist`] - list playlists, add a track to one
//! - [`album`] / [`playlist`] - drill down into the tracks of an album or
//!   playlist listed on the home feed
//! - [`play`] - hands a track over to the Spotify player
//! - [`status`] - shows the cached token's state
//!
//! ## Error Handling
//!
//! - A missing token cache ends the command with a hint to run `auth`
//! - A home section that fails to load is reported as a warning while the
//!   remaining sections are still printed
//! - Ctrl-C while the home feed loads cancels all outstanding requests

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{error, spotify::WebApiClient, types::AudioTrack, types::TrackTableRow, utils};

mod auth;
mod home;
mod play;
mod playlist;
mod search;
mod status;
mod tracks;

pub use auth::auth;
pub use home::home;
pub use play::play;
pub use playlist::add_to_playlist;
pub use playlist::playlists;
pub use search::search;
pub use status::status;
pub use tracks::album;
pub use tracks::playlist;

pub(crate) fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );
    pb
}

pub(crate) async fn load_client() -> WebApiClient {
    match WebApiClient::from_cache().await {
        Ok(client) => client,
        Err(e) => error!(
            "Failed to load token. Please run sporlfeed auth\n Error: {}",
            e
        ),
    }
}

pub(crate) fn track_table(tracks: Vec<AudioTrack>) -> Table {
    Table::new(tracks.into_iter().map(|t| TrackTableRow {
        artist: utils::first_artist_name(&t.artists),
        length: utils::format_duration_ms(t.duration_ms),
        id: t.id,
        name: t.name,
    }))
}
