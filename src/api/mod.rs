//! # API Module
//!
//! HTTP handlers of the local redirect server that receives the browser
//! after the user signed in with Spotify.
//!
//! ## Endpoints
//!
//! - [`callback`] - mounted on the path of the configured redirect URI. Each
//!   request is a navigation of the sign-in browser and is handed to the
//!   [`crate::spotify::exchange::AuthExchangeFlow`], which exchanges the first
//!   authorization code it sees and ignores everything after it.
//! - [`health`] - returns status, name and version for quick checks that the
//!   server is up.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Extension, Router, routing::get};
//! use sporlfeed::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback).layer(Extension(flow)))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::{callback, redirect_url};
pub use health::health;
