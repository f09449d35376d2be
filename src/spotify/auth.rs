use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config::Config,
    error::PipelineError,
    info,
    spotify::{Authorizer, Session, SpotifyClient},
    types::{PkceToken, Token},
    utils, warning,
};

/// How long the user gets to finish the consent page.
pub const AUTHORIZATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Interactive authorization-code flow driven through the user's browser.
///
/// The flow:
/// 1. **PKCE Setup**: a random code verifier, its SHA256 challenge and a random
///    `state` value are stored in the shared state
/// 2. **Browser Launch**: the consent URL is opened (or printed when no browser
///    can be started)
/// 3. **Callback**: the local server's `/callback` route exchanges the code and
///    stores the token (or the failure) in the shared state
/// 4. **Wait**: [`BrowserAuthorizer::authorize`] blocks until a token arrives,
///    the callback reports a failure, or [`AUTHORIZATION_TIMEOUT`] elapses
///
/// The callback server itself is started by the caller, since it also serves
/// the preference form.
pub struct BrowserAuthorizer {
    config: Arc<Config>,
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    timeout: Duration,
}

impl BrowserAuthorizer {
    pub fn new(config: Arc<Config>, shared_state: Arc<Mutex<Option<PkceToken>>>) -> Self {
        BrowserAuthorizer {
            config,
            shared_state,
            timeout: AUTHORIZATION_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Authorizer for BrowserAuthorizer {
    async fn authorize(&self, scopes: &[&str]) -> Result<Session, PipelineError> {
        let code_verifier = utils::generate_code_verifier();
        let code_challenge = utils::generate_code_challenge(&code_verifier);
        let state = utils::generate_state();

        let auth_url = utils::build_authorize_url(&self.config, scopes, &code_challenge, &state)
            .map_err(|e| PipelineError::InvalidConfig {
                var: "SPOTIFY_API_AUTH_URL",
                reason: e,
            })?;

        // Store verifier in shared state before redirect
        {
            let mut lock = self.shared_state.lock().await;
            *lock = Some(PkceToken {
                code_verifier,
                state,
                token: None,
                error: None,
            });
        }

        if webbrowser::open(&auth_url).is_err() {
            warning!(
                "Failed to open browser. Please navigate to the following URL manually:\n{}",
                auth_url
            );
        } else {
            info!("Waiting for Spotify authorization in your browser...");
        }

        let token = wait_for_token(Arc::clone(&self.shared_state), self.timeout)
            .await
            .map_err(PipelineError::Authorization)?;

        if token.access_token.is_empty() {
            return Err(PipelineError::Authorization(
                "Spotify returned an empty access token".to_string(),
            ));
        }

        Ok(Session {
            catalog: Arc::new(SpotifyClient::new(
                self.config.spotify_api_url.clone(),
                token.access_token.clone(),
            )),
            token,
        })
    }
}

/// Polls the shared state every 250 ms until the callback has produced a
/// token or an error, or until `max_wait` has passed.
pub async fn wait_for_token(
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    max_wait: Duration,
) -> Result<Token, String> {
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Ok(token.clone());
            }
            if let Some(error) = &pkce_token.error {
                return Err(error.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_millis(250).min(max_wait)).await;
    }

    Err("authorization timed out".to_string())
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    scope: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Exchanges an authorization code for an access token.
///
/// The client authenticates with HTTP Basic (id + secret) and proves
/// possession of the PKCE verifier that produced the challenge.
pub async fn exchange_code(
    config: &Config,
    code: &str,
    verifier: &str,
) -> Result<Token, PipelineError> {
    let client = Client::new();
    let res = client
        .post(&config.spotify_token_url)
        .basic_auth(&config.spotify_client_id, Some(&config.spotify_client_secret))
        .form(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ])
        .send()
        .await
        .map_err(PipelineError::spotify)?;

    let status = res.status();
    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        return Err(PipelineError::Authorization(format!(
            "token exchange rejected ({status}): {body}"
        )));
    }

    let json: TokenResponse = res.json().await.map_err(PipelineError::spotify)?;

    Ok(Token {
        access_token: json.access_token,
        scope: json.scope.unwrap_or_default(),
        expires_in: json.expires_in.unwrap_or(3600),
        obtained_at: Utc::now(),
    })
}
