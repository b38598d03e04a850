//! Configuration management for deezify.
//!
//! Values come from environment variables, optionally seeded from a `.env`
//! file in the local data directory:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)
//!
//! Credentials without a sensible default are read through [`require`], which
//! returns [`MigrationError::Configuration`] instead of panicking, so a
//! missing key stops a migration before it talks to any service.

use std::{env, path::PathBuf, time::Duration};

use crate::{error::MigrationError, search::DEFAULT_MAX_PAGES};

pub const DEFAULT_SOURCE_TAG: &str = "deezer";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Loads environment variables from a `.env` file in the local data directory.
///
/// The file lives in:
/// - Linux: `~/.local/share/deezify/.env`
/// - macOS: `~/Library/Application Support/deezify/.env`
/// - Windows: `%LOCALAPPDATA%/deezify/.env`
///
/// Variables already present in the process environment win over the file.
/// A missing file is not an error.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or the file
/// cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    // the file is optional, plain environment variables work as well
    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(())
}

/// Base directory for the `.env` file and cached tokens.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("deezify");
    path
}

/// Reads a required setting.
pub fn require(key: &str) -> Result<String, MigrationError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MigrationError::missing_setting(key)),
    }
}

fn or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Address the local callback server binds to, e.g. `127.0.0.1:8080`.
pub fn server_addr() -> Result<String, MigrationError> {
    require("SERVER_ADDRESS")
}

pub fn spotify_client_id() -> Result<String, MigrationError> {
    require("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Must match the redirect URI registered for the Spotify application,
/// e.g. `http://127.0.0.1:8080/callback/spotify`.
pub fn spotify_redirect_uri() -> Result<String, MigrationError> {
    require("SPOTIFY_API_REDIRECT_URI")
}

pub fn spotify_scope() -> String {
    or_default(
        "SPOTIFY_API_AUTH_SCOPE",
        "playlist-modify-private playlist-modify-public",
    )
}

pub fn spotify_apiauth_url() -> String {
    or_default(
        "SPOTIFY_API_AUTH_URL",
        "https://accounts.spotify.com/authorize",
    )
}

pub fn spotify_apitoken_url() -> String {
    or_default(
        "SPOTIFY_API_TOKEN_URL",
        "https://accounts.spotify.com/api/token",
    )
}

pub fn spotify_apiurl() -> String {
    or_default("SPOTIFY_API_URL", "https://api.spotify.com/v1")
}

pub fn deezer_app_id() -> Result<String, MigrationError> {
    require("DEEZER_APP_ID")
}

/// # Security Note
///
/// The application secret should be kept confidential and never exposed in
/// logs or version control.
pub fn deezer_secret() -> Result<String, MigrationError> {
    require("DEEZER_SECRET")
}

pub fn deezer_redirect_uri() -> Result<String, MigrationError> {
    require("DEEZER_REDIRECT_URI")
}

/// Deezer permissions; `offline_access` yields a token that does not expire.
pub fn deezer_perms() -> String {
    or_default("DEEZER_PERMS", "basic_access,offline_access")
}

pub fn deezer_auth_url() -> String {
    or_default("DEEZER_AUTH_URL", "https://connect.deezer.com/oauth/auth.php")
}

pub fn deezer_token_url() -> String {
    or_default(
        "DEEZER_TOKEN_URL",
        "https://connect.deezer.com/oauth/access_token.php",
    )
}

pub fn deezer_apiurl() -> String {
    or_default("DEEZER_API_URL", "https://api.deezer.com")
}

/// Prefix for playlists created on Spotify, e.g. `deezer_my_mix`.
pub fn source_tag() -> String {
    or_default("MIGRATION_SOURCE_TAG", DEFAULT_SOURCE_TAG)
}

/// Upper bound on search result pages scanned per track.
pub fn max_search_pages() -> Result<usize, MigrationError> {
    parse_positive(
        "MIGRATION_MAX_SEARCH_PAGES",
        env::var("MIGRATION_MAX_SEARCH_PAGES").ok(),
        DEFAULT_MAX_PAGES as u64,
    )
    .map(|pages| pages as usize)
}

/// Timeout applied to every HTTP request.
pub fn http_timeout() -> Result<Duration, MigrationError> {
    parse_positive(
        "HTTP_TIMEOUT_SECS",
        env::var("HTTP_TIMEOUT_SECS").ok(),
        DEFAULT_HTTP_TIMEOUT_SECS,
    )
    .map(Duration::from_secs)
}

fn parse_positive(key: &str, raw: Option<String>, default: u64) -> Result<u64, MigrationError> {
    let Some(raw) = raw else {
        return Ok(default);
    };

    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(MigrationError::Configuration(format!(
            "{} must be a positive integer, got '{}'",
            key, raw
        ))),
    }
}
