use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use reqwest::Url;
use sha2::{Digest, Sha256};

use crate::{
    config::Config,
    types::{GeneratedSong, ResolvedTrack, TrackTableRow},
};

pub fn generate_code_verifier() -> String {
    random_alphanumeric(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

pub fn generate_state() -> String {
    random_alphanumeric(32)
}

fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Consent page URL for the authorization-code flow.
pub fn build_authorize_url(
    config: &Config,
    scopes: &[&str],
    code_challenge: &str,
    state: &str,
) -> Result<String, String> {
    let scope = scopes.join(" ");
    let url = Url::parse_with_params(
        &config.spotify_auth_url,
        &[
            ("client_id", config.spotify_client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("state", state),
            ("scope", scope.as_str()),
        ],
    )
    .map_err(|e| e.to_string())?;

    Ok(url.into())
}

/// Catalog query for one generated song: `"<song> <artist1>,<artist2>"`.
pub fn build_search_query(song: &GeneratedSong) -> String {
    format!("{} {}", song.song_name, song.artists.join(","))
}

/// Keeps the first four characters of a secret.
pub fn mask_secret(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    if secret.chars().count() <= 4 {
        "*".repeat(secret.chars().count())
    } else {
        format!("{}{}", visible, "*".repeat(8))
    }
}

pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn track_table_rows(tracks: &[ResolvedTrack]) -> Vec<TrackTableRow> {
    tracks
        .iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: i + 1,
            song: t.song.song_name.clone(),
            artists: t.song.artists.join(", "),
            uri: t.uri.clone(),
        })
        .collect()
}
