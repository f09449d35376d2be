//! Playlist generation through a chat model.
//!
//! The model is given a persona, the user's vibe and song count, and a single
//! callable function, `createPlaylist`, whose parameter schema is the shape we
//! want back. The answer is parsed later by [`crate::resolver`].

use serde_json::{Value, json};

use crate::{
    error::PipelineError,
    openai::ChatModel,
    types::{ChatMessage, ChatRequest, ChatResponse, UserPreference},
};

pub const FUNCTION_NAME: &str = "createPlaylist";

const SYSTEM_PROMPT: &str = "You are SpotifyGPT. The smartest music bot in the universe. \
You will generate songs based on a users preference that will then go into a playlist. \
These songs must be available on Spotify. Give each playlist a unique name and description.";

pub fn system_message() -> ChatMessage {
    ChatMessage {
        role: "system".to_string(),
        content: SYSTEM_PROMPT.to_string(),
    }
}

pub fn user_message(preference: &UserPreference) -> ChatMessage {
    ChatMessage {
        role: "user".to_string(),
        content: format!(
            "Hey SpotifyGPT! Create a playlist based on my preference which is {}, \
make sure the playlist includes {} songs. Make sure the songs are available on Spotify.",
            preference.vibe, preference.song_count
        ),
    }
}

/// JSON schema of the `createPlaylist` function.
pub fn playlist_function_schema() -> Value {
    json!({
        "name": FUNCTION_NAME,
        "description": "Creates a Spotify playlist from a number of songs.",
        "parameters": {
            "type": "object",
            "properties": {
                "playlistName": {
                    "type": "string",
                    "description": "The name of the playlist"
                },
                "playlistDescription": {
                    "type": "string",
                    "description": "The description of the playlist"
                },
                "songs": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "songName": {
                                "type": "string",
                                "description": "The name of the song"
                            },
                            "artists": {
                                "type": "array",
                                "description": "The list of all the artists",
                                "items": {
                                    "type": "string",
                                    "description": "The name of the artist"
                                }
                            }
                        },
                        "required": ["songName", "artists"]
                    }
                }
            },
            "required": ["playlistName", "playlistDescription", "songs"]
        }
    })
}

pub fn build_request(model: &str, preference: &UserPreference) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        messages: vec![system_message(), user_message(preference)],
        functions: vec![playlist_function_schema()],
        function_call: Some(json!({ "name": FUNCTION_NAME })),
    }
}

/// Sends the generation request and returns the raw response.
pub async fn generate(
    chat: &dyn ChatModel,
    model: &str,
    preference: &UserPreference,
) -> Result<ChatResponse, PipelineError> {
    let request = build_request(model, preference);
    chat.complete(&request).await
}
