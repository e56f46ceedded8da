//! Configuration management for the MusicMood CLI.
//!
//! Configuration values come from environment variables, optionally seeded from
//! a `.env` file in the platform-specific local data directory. The lookup order
//! is:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults
//!
//! Every accessor either has a default or returns an `Option`, so a missing key
//! never aborts the program.

use std::{env, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_CATALOG_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_MARKET: &str = "KR";

/// Loads environment variables from `musicmood/.env` in the local data directory.
///
/// Creates the directory if needed. A missing `.env` file is not an error, the
/// defaults and the process environment are used instead.
///
/// The file is looked up in:
/// - Linux: `~/.local/share/musicmood/.env`
/// - macOS: `~/Library/Application Support/musicmood/.env`
/// - Windows: `%LOCALAPPDATA%/musicmood/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the file
/// exists but cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Root of everything MusicMood stores locally (`<data_local_dir>/musicmood`).
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("musicmood");
    path
}

/// Base URL of the MusicMood web server (`MUSICMOOD_BASE_URL`).
///
/// Hosts the token endpoint (`/api/token`), the playlist endpoints
/// (`/playlist.do`) and profile updates (`/profile.do`).
pub fn base_url() -> String {
    var_or("MUSICMOOD_BASE_URL", DEFAULT_BASE_URL)
}

/// Base URL of the third-party catalog API (`MUSICMOOD_CATALOG_URL`).
pub fn catalog_url() -> String {
    var_or("MUSICMOOD_CATALOG_URL", DEFAULT_CATALOG_URL)
}

/// Market used for catalog searches (`MUSICMOOD_MARKET`).
pub fn market() -> String {
    var_or("MUSICMOOD_MARKET", DEFAULT_MARKET)
}

/// Cookie header identifying the signed-in user (`MUSICMOOD_SESSION_COOKIE`).
pub fn session_cookie() -> Option<String> {
    non_empty("MUSICMOOD_SESSION_COOKIE")
}

/// Current user id override (`MUSICMOOD_USER_ID`).
pub fn user_id() -> Option<String> {
    non_empty("MUSICMOOD_USER_ID")
}

/// Whether debug output is enabled (`MUSICMOOD_DEBUG`).
pub fn debug_enabled() -> bool {
    non_empty("MUSICMOOD_DEBUG").is_some()
}

fn var_or(key: &str, default: &str) -> String {
    non_empty(key)
        .map(|v| v.trim_end_matches('/').to_string())
        .unwrap_or_else(|| default.to_string())
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
