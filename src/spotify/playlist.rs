use reqwest::{Client, Response};
use serde_json::Value;

use crate::{
    error::PipelineError,
    types::{
        AddTrackToPlaylistRequest, AddTrackToPlaylistResponse, CreatePlaylistRequest,
        CreatePlaylistResponse, CurrentUser,
    },
};

/// Fetches the profile behind the access token (`GET /me`).
pub async fn current_user(
    client: &Client,
    api_url: &str,
    token: &str,
) -> Result<CurrentUser, PipelineError> {
    let response = client
        .get(format!("{api_url}/me"))
        .bearer_auth(token)
        .send()
        .await
        .map_err(PipelineError::spotify)?;

    let response = ensure_success(response).await?;
    response
        .json::<CurrentUser>()
        .await
        .map_err(PipelineError::spotify)
}

/// Creates an empty playlist owned by `user_id`.
///
/// Visibility comes from the request; SpotifyGPT always sends
/// `public: false`. The response carries the shareable link under
/// `external_urls.spotify`.
pub async fn create(
    client: &Client,
    api_url: &str,
    token: &str,
    user_id: &str,
    request: &CreatePlaylistRequest,
) -> Result<CreatePlaylistResponse, PipelineError> {
    let response = client
        .post(format!("{api_url}/users/{user_id}/playlists"))
        .bearer_auth(token)
        .json(request)
        .send()
        .await
        .map_err(PipelineError::spotify)?;

    let response = ensure_success(response).await?;
    response
        .json::<CreatePlaylistResponse>()
        .await
        .map_err(PipelineError::spotify)
}

/// Appends `uris` to a playlist in a single request, preserving order.
pub async fn add_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    playlist_id: &str,
    uris: &[String],
) -> Result<AddTrackToPlaylistResponse, PipelineError> {
    let body = AddTrackToPlaylistRequest {
        uris: uris.to_vec(),
    };

    let response = client
        .post(format!("{api_url}/playlists/{playlist_id}/tracks"))
        .bearer_auth(token)
        .json(&body)
        .send()
        .await
        .map_err(PipelineError::spotify)?;

    let response = ensure_success(response).await?;
    response
        .json::<AddTrackToPlaylistResponse>()
        .await
        .map_err(PipelineError::spotify)
}

/// Turns a rejected call into [`PipelineError::Publish`] carrying Spotify's message.
async fn ensure_success(response: Response) -> Result<Response, PipelineError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PipelineError::Publish(format!(
        "{} ({})",
        remote_message(&body),
        status
    )))
}

/// Spotify errors look like `{"error": {"status": 403, "message": "..."}}`.
fn remote_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json["error"]["message"]
                .as_str()
                .or_else(|| json["error"].as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            if body.is_empty() {
                "no details".to_string()
            } else {
                body.to_string()
            }
        })
}
