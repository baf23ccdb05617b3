//! Spotify Home Feed CLI Library
//!
//! This library fetches the Spotify "home" feed (new album releases, featured
//! playlists and genre-seeded recommendations) concurrently, joins the results
//! and hands them to the terminal front end. It also implements the browser
//! based PKCE sign-in flow and the token lifecycle behind every API call.
//!
//! # Modules
//!
//! - `api` - HTTP handlers for the local redirect server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `home` - Concurrent aggregation of the home feed sections
//! - `management` - Token cache and refresh
//! - `server` - Local HTTP server receiving the OAuth redirect
//! - `spotify` - Spotify Web API client and the authorization exchange flow
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sporlfeed::{home::AggregationCoordinator, spotify::client::WebApiClient};
//!
//! #[tokio::main]
//! async fn main() -> sporlfeed::Res<()> {
//!     sporlfeed::config::load_env().await?;
//!     let api = Arc::new(WebApiClient::from_cache().await?);
//!     let feed = AggregationCoordinator::new(api).fetch_all().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod home;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// A convenient Result type alias for operations that may fail.
///
/// Used by the binary-level plumbing where any error is reported and the
/// process exits. Library modules return their own typed errors.
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints an informational message with a blue bullet point.
///
/// # Example
///
/// ```
/// info!("Starting authentication process...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```
/// success!("Authentication completed successfully");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Writes to stderr and terminates the process with exit code 1. Only the
/// CLI layer uses this macro; library code returns errors instead.
///
/// # Example
///
/// ```
/// error!("Missing required environment variable: {}", var_name);
/// // Program exits here - code after this will not execute
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark to stderr.
///
/// Used for recoverable issues, e.g. a single home section that failed to
/// load while the others are still shown.
///
/// # Example
///
/// ```
/// warning!("Featured playlists unavailable: {}", err);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
