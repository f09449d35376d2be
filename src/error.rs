//! Error taxonomy for a single playlist run.
//!
//! Every variant aborts the current run. Nothing here is retried; the caller
//! decides how to present the message (terminal line or page notice).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required environment variable is not set.
    #[error("missing required configuration variable {var}")]
    MissingConfig { var: &'static str },

    #[error("invalid configuration value for {var}: {reason}")]
    InvalidConfig { var: &'static str, reason: String },

    /// Consent declined, timed out, or yielded no usable token.
    #[error("Spotify authorization failed: {0}")]
    Authorization(String),

    /// The chat response did not carry the expected function-call payload.
    #[error("playlist generation failed: {0}")]
    Generation(String),

    /// The chat model answered with an empty playlist.
    #[error("the generated playlist is empty, nothing to publish")]
    EmptyPlaylist,

    #[error("could not find a catalog match for '{song}' by {artists}")]
    Resolution { song: String, artists: String },

    #[error("publishing the playlist failed: {0}")]
    Publish(String),

    #[error("request to {service} failed: {source}")]
    Http {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl PipelineError {
    pub fn resolution(song: &str, artists: &[String]) -> Self {
        PipelineError::Resolution {
            song: song.to_string(),
            artists: artists.join(", "),
        }
    }

    pub fn spotify(source: reqwest::Error) -> Self {
        PipelineError::Http {
            service: "Spotify",
            source,
        }
    }

    pub fn openai(source: reqwest::Error) -> Self {
        PipelineError::Http {
            service: "OpenAI",
            source,
        }
    }
}
