//! Configuration management for SpotifyGPT.
//!
//! Values come from environment variables and `.env` files and are collected
//! once into a [`Config`] that is handed to every component explicitly. The
//! lookup order is:
//! 1. Environment variables (highest priority)
//! 2. `.env` in the local data directory (`spotifygpt/.env`)
//! 3. `.env` in the working directory
//! 4. Application defaults for optional values

use std::{env, net::SocketAddr, path::PathBuf, str::FromStr};

use crate::error::PipelineError;

pub const SPOTIFY_CLIENT_ID: &str = "SPOTIFY_CLIENT_ID";
pub const SPOTIFY_CLIENT_SECRET: &str = "SPOTIFY_CLIENT_SECRET";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// The only permission ever requested from the user.
pub const SPOTIFY_SCOPE: &str = "playlist-modify-private";

/// Literal tag prepended to every generated playlist name.
pub const PLAYLIST_NAME_PREFIX: &str = "SpotifyGPT - ";

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8502";
const DEFAULT_REDIRECT_URI: &str = "http://localhost:8502/callback";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Loads environment variables from `.env` files.
///
/// Creates `spotifygpt/` under the platform data directory if needed, then
/// reads `spotifygpt/.env` from there followed by `.env` in the working
/// directory. Missing files are not an error; `dotenv` never overrides
/// variables that are already set.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/spotifygpt/.env`
/// - macOS: `~/Library/Application Support/spotifygpt/.env`
/// - Windows: `%LOCALAPPDATA%/spotifygpt/.env`
pub async fn load_env() -> Result<(), String> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("spotifygpt/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    // a local .env is optional
    let _ = dotenv::dotenv();
    Ok(())
}

/// Resolved configuration for one process.
#[derive(Debug, Clone)]
pub struct Config {
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_url: String,
    pub spotify_api_url: String,
    pub spotify_auth_url: String,
    pub spotify_token_url: String,
    pub redirect_uri: String,
    pub server_addr: SocketAddr,
}

impl Config {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    ///
    /// Required secrets must be present and non-empty. Optional values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |var: &'static str| -> Result<String, PipelineError> {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(PipelineError::MissingConfig { var })
        };
        let optional = |var: &str, default: &str| -> String {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let server_addr = optional("SPOTIFYGPT_SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS);
        let server_addr =
            SocketAddr::from_str(&server_addr).map_err(|e| PipelineError::InvalidConfig {
                var: "SPOTIFYGPT_SERVER_ADDRESS",
                reason: e.to_string(),
            })?;

        Ok(Config {
            spotify_client_id: required(SPOTIFY_CLIENT_ID)?,
            spotify_client_secret: required(SPOTIFY_CLIENT_SECRET)?,
            openai_api_key: required(OPENAI_API_KEY)?,
            openai_model: optional("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
            openai_api_url: trim_url(optional("OPENAI_API_URL", DEFAULT_OPENAI_API_URL)),
            spotify_api_url: trim_url(optional("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)),
            spotify_auth_url: optional("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            spotify_token_url: optional("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            redirect_uri: optional("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI),
            server_addr,
        })
    }

    /// Address the form page is reachable at.
    pub fn page_url(&self) -> String {
        format!("http://{}/", self.server_addr)
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
