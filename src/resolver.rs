//! Turns a chat response into catalog tracks.
//!
//! Unmatched songs fail the whole run: a search with zero hits produces
//! [`PipelineError::Resolution`] naming the song, and nothing is published.

use serde_json::Value;

use crate::{
    config::PLAYLIST_NAME_PREFIX,
    error::PipelineError,
    spotify::MusicCatalog,
    types::{ChatResponse, GeneratedPlaylistSpec, ResolvedPlaylist, ResolvedTrack},
    utils,
};

/// Extracts the `createPlaylist` arguments from a chat response.
///
/// Returns `Ok(None)` when the arguments are empty (`{}`, `[]`, `""`, `null`,
/// `false`, `0`, blank) or carry no songs. A response without a function call, or arguments that do
/// not match the schema, is a [`PipelineError::Generation`].
pub fn parse_function_arguments(
    response: &ChatResponse,
) -> Result<Option<GeneratedPlaylistSpec>, PipelineError> {
    let function_call = response
        .choices
        .first()
        .and_then(|choice| choice.message.function_call.as_ref())
        .ok_or_else(|| {
            PipelineError::Generation("the response carries no function call".to_string())
        })?;

    if function_call.arguments.trim().is_empty() {
        return Ok(None);
    }

    let arguments: Value = serde_json::from_str(&function_call.arguments).map_err(|e| {
        PipelineError::Generation(format!("function arguments are not valid JSON: {e}"))
    })?;

    let is_empty = match &arguments {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    };
    if is_empty {
        return Ok(None);
    }

    let spec: GeneratedPlaylistSpec = serde_json::from_value(arguments).map_err(|e| {
        PipelineError::Generation(format!("function arguments do not match the schema: {e}"))
    })?;

    if spec.songs.is_empty() {
        return Ok(None);
    }

    Ok(Some(spec))
}

/// Resolves every generated song to the URI of its top search hit.
///
/// One search per song, sequentially, in generation order. The playlist name
/// gets the [`PLAYLIST_NAME_PREFIX`] tag.
pub async fn resolve(
    catalog: &dyn MusicCatalog,
    response: &ChatResponse,
) -> Result<Option<ResolvedPlaylist>, PipelineError> {
    let Some(spec) = parse_function_arguments(response)? else {
        return Ok(None);
    };

    let mut tracks = Vec::with_capacity(spec.songs.len());
    for song in spec.songs {
        let query = utils::build_search_query(&song);
        let hits = catalog.search_tracks(&query, 1).await?;
        let Some(top) = hits.into_iter().next() else {
            return Err(PipelineError::resolution(&song.song_name, &song.artists));
        };
        tracks.push(ResolvedTrack {
            song,
            uri: top.uri,
        });
    }

    Ok(Some(ResolvedPlaylist {
        name: format!("{}{}", PLAYLIST_NAME_PREFIX, spec.playlist_name),
        description: spec.playlist_description,
        tracks,
    }))
}
