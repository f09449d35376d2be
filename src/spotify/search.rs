use reqwest::Client;

use crate::{
    error::PipelineError,
    types::{SearchResponse, Track},
};

/// Searches the catalog for tracks matching a free-text query.
///
/// Calls `GET {api_url}/search?q=<query>&type=track&limit=<limit>` and returns
/// the ranked items, best match first. An empty vector means the catalog has
/// nothing for the query; deciding what that means is up to the caller.
///
/// # Errors
///
/// Network failures, non-2xx statuses and malformed bodies become
/// [`PipelineError::Http`]. Nothing is retried.
pub async fn search_tracks(
    client: &Client,
    api_url: &str,
    token: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<Track>, PipelineError> {
    let limit = limit.to_string();
    let response = client
        .get(format!("{api_url}/search"))
        .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
        .bearer_auth(token)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(PipelineError::spotify)?;

    let json = response
        .json::<SearchResponse>()
        .await
        .map_err(PipelineError::spotify)?;

    Ok(json.tracks.items)
}
