//! Configuration management for chartsync.
//!
//! This module handles loading and accessing configuration values from
//! environment variables and `.env` files. It provides a centralized way
//! to manage application configuration including Spotify API endpoints,
//! the OAuth redirect, the chart source and the database location.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf};

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from `chartsync/.env` in the platform-specific
/// local data directory. This allows users to store configuration securely
/// without hardcoding sensitive values.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created. A missing
/// `.env` file is not an error; every value can also come from the process
/// environment.
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("chartsync/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    let _ = dotenv::from_path(path);
    Ok(())
}

/// Returns the server address for the local OAuth callback server.
///
/// # Panics
///
/// Panics if the `SERVER_ADDRESS` environment variable is not set.
pub fn server_addr() -> String {
    env::var("SERVER_ADDRESS").expect("SERVER_ADDRESS must be set")
}

/// Returns the Spotify Web API base URL.
pub fn spotify_apiurl() -> String {
    env::var("SPOTIFY_API_URL").unwrap_or_else(|_| "https://api.spotify.com/v1".to_string())
}

/// Returns the Spotify OAuth token exchange URL.
pub fn spotify_apitoken_url() -> String {
    env::var("SPOTIFY_API_TOKEN_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/api/token".to_string())
}

/// Returns the Spotify OAuth authorization URL.
pub fn spotify_apiauth_url() -> String {
    env::var("SPOTIFY_API_AUTH_URL")
        .unwrap_or_else(|_| "https://accounts.spotify.com/authorize".to_string())
}

/// Returns the Spotify OAuth redirect URI.
///
/// Must match the redirect URI registered in the Spotify application
/// settings.
///
/// # Panics
///
/// Panics if the `SPOTIFY_API_REDIRECT_URI` environment variable is not set.
pub fn spotify_redirect_uri() -> String {
    env::var("SPOTIFY_API_REDIRECT_URI").expect("SPOTIFY_API_REDIRECT_URI must be set")
}

/// Returns the Spotify API scope permissions requested during authorization.
pub fn spotify_scope() -> String {
    env::var("SPOTIFY_API_AUTH_SCOPE")
        .unwrap_or_else(|_| "playlist-modify-public playlist-modify-private".to_string())
}

/// Returns the market (ISO country code) used for catalog searches.
///
/// Search results are market-dependent; candidates unavailable in this
/// market come back without artist information.
pub fn spotify_market() -> String {
    env::var("SPOTIFY_MARKET").unwrap_or_else(|_| "PH".to_string())
}

/// Returns the path of the SQLite database file.
pub fn database_path() -> PathBuf {
    match env::var("CHARTSYNC_DATABASE") {
        Ok(p) => PathBuf::from(p),
        Err(_) => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("chartsync/chartsync.sqlite3");
            path
        }
    }
}

/// Returns the base URL of the chart source.
pub fn chart_base_url() -> String {
    env::var("CHART_BASE_URL").unwrap_or_else(|_| "https://www.beatport.com".to_string())
}

/// Returns the path of the durable credential store.
///
/// The file holds the client id/secret pair and the current access/refresh
/// tokens; it is rewritten whenever tokens rotate.
pub fn credentials_path() -> PathBuf {
    match env::var("CHARTSYNC_CREDENTIALS") {
        Ok(p) => PathBuf::from(p),
        Err(_) => {
            let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            path.push("chartsync/credentials.json");
            path
        }
    }
}
