#![allow(dead_code)]

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use serde_json::json;
use spotifygpt::{
    error::PipelineError,
    openai::ChatModel,
    pipeline::{RunState, StageObserver},
    spotify::MusicCatalog,
    types::{
        AddTrackToPlaylistResponse, ChatChoice, ChatRequest, ChatResponse, ChatResponseMessage,
        CreatePlaylistRequest, CreatePlaylistResponse, CurrentUser, ExternalUrls, FunctionCall,
        Track,
    },
};

/// Chat model that answers every request with the same function arguments.
pub struct FakeChat {
    pub arguments: Option<String>,
    pub requests: Mutex<Vec<ChatRequest>>,
}

impl FakeChat {
    pub fn with_arguments(arguments: &str) -> Self {
        FakeChat {
            arguments: Some(arguments.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn without_function_call() -> Self {
        FakeChat {
            arguments: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for FakeChat {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, PipelineError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(chat_response(self.arguments.as_deref()))
    }
}

pub fn chat_response(arguments: Option<&str>) -> ChatResponse {
    ChatResponse {
        choices: vec![ChatChoice {
            message: ChatResponseMessage {
                content: None,
                function_call: arguments.map(|a| FunctionCall {
                    name: "createPlaylist".to_string(),
                    arguments: a.to_string(),
                }),
            },
        }],
    }
}

pub fn run_fast_arguments() -> String {
    json!({
        "playlistName": "Run Fast",
        "playlistDescription": "High-energy tracks",
        "songs": [
            {"songName": "Song A", "artists": ["Artist1"]},
            {"songName": "Song B", "artists": ["Artist2"]},
            {"songName": "Song C", "artists": ["Artist3", "Artist4"]}
        ]
    })
    .to_string()
}

/// In-memory catalog recording every call made against it.
#[derive(Default)]
pub struct FakeCatalog {
    pub tracks: HashMap<String, String>,
    pub reject_add: bool,
    pub queries: Mutex<Vec<String>>,
    pub created: Mutex<Vec<(String, CreatePlaylistRequest)>>,
    pub added: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeCatalog {
    /// Every query in `queries` resolves to `spotify:track:<n>`.
    pub fn knowing(queries: &[&str]) -> Self {
        let tracks = queries
            .iter()
            .enumerate()
            .map(|(i, q)| (q.to_string(), format!("spotify:track:{}", i + 1)))
            .collect();
        FakeCatalog {
            tracks,
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(String, CreatePlaylistRequest)> {
        self.created.lock().unwrap().clone()
    }

    pub fn added(&self) -> Vec<(String, Vec<String>)> {
        self.added.lock().unwrap().clone()
    }
}

#[async_trait]
impl MusicCatalog for FakeCatalog {
    async fn search_tracks(&self, query: &str, limit: u32) -> Result<Vec<Track>, PipelineError> {
        assert_eq!(limit, 1);
        self.queries.lock().unwrap().push(query.to_string());
        Ok(self
            .tracks
            .get(query)
            .map(|uri| Track {
                id: uri.rsplit(':').next().unwrap_or_default().to_string(),
                name: query.to_string(),
                uri: uri.clone(),
            })
            .into_iter()
            .collect())
    }

    async fn current_user(&self) -> Result<CurrentUser, PipelineError> {
        Ok(CurrentUser {
            id: "listener".to_string(),
            display_name: Some("Listener".to_string()),
        })
    }

    async fn create_playlist(
        &self,
        user_id: &str,
        request: &CreatePlaylistRequest,
    ) -> Result<CreatePlaylistResponse, PipelineError> {
        self.created
            .lock()
            .unwrap()
            .push((user_id.to_string(), request.clone()));
        Ok(CreatePlaylistResponse {
            id: "pl1".to_string(),
            name: request.name.clone(),
            description: Some(request.description.clone()),
            external_urls: ExternalUrls {
                spotify: "https://open.spotify.com/playlist/pl1".to_string(),
            },
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<AddTrackToPlaylistResponse, PipelineError> {
        if self.reject_add {
            return Err(PipelineError::Publish("Invalid base62 id (400)".to_string()));
        }
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec()));
        Ok(AddTrackToPlaylistResponse {
            snapshot_id: "snap".to_string(),
        })
    }
}

/// Observer that remembers every transition.
#[derive(Default)]
pub struct Recorder {
    pub states: Mutex<Vec<RunState>>,
}

impl Recorder {
    pub fn states(&self) -> Vec<RunState> {
        self.states.lock().unwrap().clone()
    }
}

#[async_trait]
impl StageObserver for Recorder {
    async fn enter(&self, state: RunState) {
        self.states.lock().unwrap().push(state);
    }
}
