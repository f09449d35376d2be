//! # Spotify Integration Module
//!
//! Everything SpotifyGPT needs from the Spotify Web API: the interactive
//! authorization-code flow, catalog search and private playlist creation.
//!
//! ```text
//! Pipeline (resolver, publisher)
//!          ↓
//! MusicCatalog trait
//!          ↓
//! SpotifyClient (reqwest, bearer token)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Endpoints used
//!
//! - `GET /search` - top track for a free-text query
//! - `GET /me` - owner id for new playlists
//! - `POST /users/{user_id}/playlists` - create a private playlist
//! - `POST /playlists/{playlist_id}/tracks` - add all resolved URIs at once
//! - `POST /api/token` - authorization code exchange
//!
//! The pipeline only talks to [`MusicCatalog`], so tests can hand it an
//! in-memory catalog instead of a live client. No call is retried.

pub mod auth;
pub mod playlist;
pub mod search;

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::PipelineError,
    types::{
        AddTrackToPlaylistResponse, CreatePlaylistRequest, CreatePlaylistResponse, CurrentUser,
        Token, Track,
    },
};

/// The catalog and playlist operations the pipeline consumes.
#[async_trait]
pub trait MusicCatalog: Send + Sync {
    /// Ranked tracks for `query`, at most `limit` of them.
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, PipelineError>;

    async fn current_user(&self) -> Result<CurrentUser, PipelineError>;

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, PipelineError>;

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, PipelineError>;
}

/// Authenticated handle on the Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    pub fn new(api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        SpotifyClient {
            http: Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl MusicCatalog for SpotifyClient {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, PipelineError> {
        search::search_tracks(&self.http, &self.api_url, &self.access_token, query, limit).await
    }

    async fn current_user(&self) -> Result<CurrentUser, PipelineError> {
        playlist::current_user(&self.http, &self.api_url, &self.access_token).await
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, PipelineError> {
        playlist::create(
            &self.http,
            &self.api_url,
            &self.access_token,
            user_id,
            request,
        )
        .await
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, PipelineError> {
        playlist::add_tracks(
            &self.http,
            &self.api_url,
            &self.access_token,
            playlist_id,
            uris,
        )
        .await
    }
}

/// Result of a completed consent flow.
#[derive(Clone)]
pub struct Session {
    pub catalog: Arc<dyn MusicCatalog>,
    pub token: Token,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("scope", &self.token.scope)
            .field("expires_in", &self.token.expires_in)
            .finish_non_exhaustive()
    }
}

/// Anything that can obtain a scoped session for the user.
#[async_trait]
pub trait Authorizer: Send + Sync {
    async fn authorize(&self, scopes: &[&str]) -> Result<Session, PipelineError>;
}
