use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

pub const MIN_SONG_COUNT: u8 = 1;
pub const MAX_SONG_COUNT: u8 = 20;
pub const DEFAULT_SONG_COUNT: u8 = 5;

/// An access token held in memory for one session.
#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: DateTime<Utc>,
}

impl Token {
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.obtained_at + TimeDelta::seconds(self.expires_in as i64)
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// In-flight authorization state shared with the callback handler.
#[derive(Debug, Clone)]
pub struct PkceToken {
    pub code_verifier: String,
    pub state: String,
    pub token: Option<Token>,
    pub error: Option<String>,
}

/// What the user asked for on one form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPreference {
    pub vibe: String,
    pub song_count: u8,
}

impl UserPreference {
    /// The count is clamped into the slider range.
    pub fn new(vibe: impl Into<String>, song_count: u32) -> Self {
        let song_count = song_count.clamp(MIN_SONG_COUNT as u32, MAX_SONG_COUNT as u32) as u8;
        UserPreference {
            vibe: vibe.into(),
            song_count,
        }
    }

    /// An empty or whitespace-only vibe means nothing was submitted yet.
    pub fn is_submitted(&self) -> bool {
        !self.vibe.trim().is_empty()
    }
}

impl Default for UserPreference {
    fn default() -> Self {
        UserPreference {
            vibe: String::new(),
            song_count: DEFAULT_SONG_COUNT,
        }
    }
}

/// Arguments of the `createPlaylist` function call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlaylistSpec {
    pub playlist_name: String,
    pub playlist_description: String,
    pub songs: Vec<GeneratedSong>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSong {
    pub song_name: String,
    pub artists: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrack {
    pub song: GeneratedSong,
    pub uri: String,
}

/// Output of the resolver: everything the publisher needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlaylist {
    pub name: String,
    pub description: String,
    pub tracks: Vec<ResolvedTrack>,
}

impl ResolvedPlaylist {
    pub fn uris(&self) -> Vec<String> {
        self.tracks.iter().map(|t| t.uri.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPlaylist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub external_url: String,
    pub tracks: Vec<ResolvedTrack>,
}

// Spotify Web API

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: SearchTracks,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchTracks {
    pub items: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistResponse {
    pub snapshot_id: String,
}

// Chat completions API

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub functions: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub function_call: Option<FunctionCall>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

// Terminal tables

#[derive(Tabled)]
pub struct TrackTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub song: String,
    pub artists: String,
    pub uri: String,
}

#[derive(Tabled)]
pub struct ConfigTableRow {
    pub variable: String,
    pub value: String,
}
