//! # Spotify Integration Module
//!
//! This module is the integration layer between sporlfeed and the Spotify Web
//! API. It owns all HTTP communication, the PKCE sign-in, retry handling and
//! the trait seams the rest of the crate is tested through.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, home feed coordinator)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (PKCE sign-in, token exchange flow)
//!     ├── Browse (new releases, featured playlists, recommendations)
//!     ├── Search
//!     ├── Albums (tracks)
//!     └── Playlists (list, tracks, add tracks)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! - [`auth`] - PKCE sign-in driver, code exchange and token refresh against
//!   the token endpoint
//! - [`exchange`] - the [`exchange::AuthExchangeFlow`] state machine that turns
//!   redirect navigations into exactly one code exchange
//! - [`client`] - [`client::WebApiClient`], the authorized HTTP client with
//!   bounded retry for GET requests
//! - [`browse`] - the [`browse::BrowseApi`] trait behind the home feed
//! - [`search`] - catalog search over albums, artists, playlists and tracks
//! - [`playlist`] - the current user's playlists, their tracks and adding
//!   tracks to them
//! - [`album`] - the tracks of an album
//!
//! ## Error Handling
//!
//! ### Rate Limiting
//! - 429 responses are retried after the `Retry-After` delay when it is at
//!   most two minutes
//!
//! ### Network Resilience
//! - 502 and 503 responses are retried with a linear backoff
//! - At most three attempts per GET request; POST requests are never retried
//!
//! ### Authentication Errors
//! - Expired tokens are refreshed transparently before a request
//! - A missing token cache surfaces as [`client::ApiError::Token`]
//!
//! ## API Coverage
//!
//! - `GET /browse/new-releases`
//! - `GET /browse/featured-playlists`
//! - `GET /recommendations/available-genre-seeds`
//! - `GET /recommendations`
//! - `GET /search`
//! - `GET /me/playlists`
//! - `GET /albums/{album_id}/tracks`
//! - `GET /playlists/{playlist_id}/tracks`
//! - `POST /playlists/{playlist_id}/tracks`
//! - `POST /api/token` - code exchange and refresh

pub mod album;
pub mod auth;
pub mod browse;
pub mod client;
pub mod exchange;
pub mod playlist;
pub mod search;

pub use browse::BrowseApi;
pub use client::{ApiError, WebApiClient};
