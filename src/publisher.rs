//! Creates the private playlist and fills it.
//!
//! A rejection after the playlist exists leaves it empty on the account;
//! nothing is rolled back.

use crate::{
    error::PipelineError,
    spotify::MusicCatalog,
    types::{CreatePlaylistRequest, PublishedPlaylist, ResolvedPlaylist},
};

/// Looks up the current user, creates a private playlist under their id and
/// adds all resolved URIs in one batch.
pub async fn publish(
    catalog: &dyn MusicCatalog,
    playlist: ResolvedPlaylist,
) -> Result<PublishedPlaylist, PipelineError> {
    if playlist.tracks.is_empty() {
        return Err(PipelineError::EmptyPlaylist);
    }

    let user = catalog.current_user().await?;

    let request = CreatePlaylistRequest {
        name: playlist.name.clone(),
        description: playlist.description.clone(),
        public: false,
    };
    let created = catalog.create_playlist(&user.id, &request).await?;

    catalog.add_tracks(&created.id, &playlist.uris()).await?;

    Ok(PublishedPlaylist {
        id: created.id,
        name: playlist.name,
        description: playlist.description,
        external_url: created.external_urls.spotify,
        tracks: playlist.tracks,
    })
}
