//! Configuration management for the Spotify home feed client.
//!
//! Configuration comes from environment variables, optionally seeded from a
//! `.env` file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (only for the optional timeouts)

use std::{env, path::PathBuf, time::Duration};

/// Default deadline for loading all home feed sections.
pub const DEFAULT_HOME_FETCH_TIMEOUT_SECS: u64 = 30;

/// Default time the sign-in flow waits for the browser redirect.
pub const DEFAULT_AUTH_TIMEOUT_SECS: u64 = 120;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/sporlfeed/.env`
/// - macOS: `~/Library/Application Support/sporlfeed/.env`
/// - Windows: `%LOCALAPPDATA%/sporlfeed/.env`
///
/// A missing file is not an error, the variables may already be exported in
/// the process environment. A file that exists but cannot be parsed is.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Returns the application's directory below the platform data directory.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlfeed");
    path
}

/// Returns the bind address of the local redirect server, e.g. `127.0.0.1:8888`.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the client ID registered with Spotify's developer platform.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_CLIENT_ID` environment variable is not set.
pub fn spotify_client_id() -> String {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID").expect("SPOTIFY_API_AUTH_CLIENT_ID must be set")
}

/// Returns the redirect URI Spotify sends the authorization code to.
///
/// Must match the URI registered for the application and point at the local
/// redirect server, e.g. `http://127.0.0.1:8888/callback`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the space separated scopes requested during sign-in.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_SCOPE` environment variable is not set.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE").expect("SPOTIFY_API_AUTH_SCOPE must be set")
}

/// Returns the authorization endpoint, e.g. `https://accounts.spotify.com/authorize`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_AUTH_URL` environment variable is not set.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL").expect("SPOTIFY_API_AUTH_URL must be set")
}

/// Returns the Web API base URL, e.g. `https://api.spotify.com/v1`.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_URL` environment variable is not set.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").expect("SPOTIFY_API_URL must be set")
}

/// Returns the token endpoint used for code exchange and refresh.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_TOKEN_URL` environment variable is not set.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL").expect("SPOTIFY_API_TOKEN_URL must be set")
}

/// Returns the deadline for loading the home feed.
///
/// Read from `HOME_FETCH_TIMEOUT_SECS`, falling back to
/// [`DEFAULT_HOME_FETCH_TIMEOUT_SECS`] when unset or not a number.
pub fn home_fetch_timeout() -> Duration {
    Duration::from_secs(seconds_from_env(
        "HOME_FETCH_TIMEOUT_SECS",
        DEFAULT_HOME_FETCH_TIMEOUT_SECS,
    ))
}

/// Returns how long `auth` waits for the sign-in redirect.
///
/// Read from `AUTH_TIMEOUT_SECS`, falling back to [`DEFAULT_AUTH_TIMEOUT_SECS`].
pub fn auth_timeout() -> Duration {
    Duration::from_secs(seconds_from_env(
        "AUTH_TIMEOUT_SECS",
        DEFAULT_AUTH_TIMEOUT_SECS,
    ))
}

fn seconds_from_env(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(default)
}
