//! Sequencing of one playlist run.
//!
//! ```text
//! Unauthenticated -> Authenticated -> AwaitingInput -> Generating
//!        |                                  ^  |
//!        v                       (empty vibe)+--+
//!     Aborted <- Resolving <-----------------------'
//!                   |
//!                   v
//!               Publishing -> Done
//! ```
//!
//! Every remote call is awaited before the next one starts. The observer is
//! told about each transition so the UI can show progress, and each
//! notification is awaited, so a slow observer delays the next stage.

use std::{fmt, sync::Arc};

use async_trait::async_trait;

use crate::{
    config::SPOTIFY_SCOPE,
    error::PipelineError,
    generator,
    openai::ChatModel,
    publisher, resolver,
    spotify::{Authorizer, MusicCatalog, Session},
    types::{PublishedPlaylist, UserPreference},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Unauthenticated,
    Authenticated,
    AwaitingInput,
    Generating,
    Resolving,
    Publishing,
    Done,
    Aborted,
}

impl RunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Done | RunState::Aborted)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Unauthenticated => "unauthenticated",
            RunState::Authenticated => "authenticated",
            RunState::AwaitingInput => "awaiting input",
            RunState::Generating => "generating",
            RunState::Resolving => "resolving",
            RunState::Publishing => "publishing",
            RunState::Done => "done",
            RunState::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Receives every state transition of a run.
#[async_trait]
pub trait StageObserver: Send + Sync {
    async fn enter(&self, state: RunState);
}

/// Observer that ignores transitions.
pub struct Silent;

#[async_trait]
impl StageObserver for Silent {
    async fn enter(&self, _state: RunState) {}
}

#[derive(Debug)]
pub enum RunOutcome {
    /// The vibe was empty; nothing was sent anywhere.
    AwaitingInput,
    Done(PublishedPlaylist),
}

/// Unauthenticated -> Authenticated, or Aborted when the flow yields no token.
pub async fn authenticate(
    authorizer: &dyn Authorizer,
    observer: &dyn StageObserver,
) -> Result<Session, PipelineError> {
    observer.enter(RunState::Unauthenticated).await;

    match authorizer.authorize(&[SPOTIFY_SCOPE]).await {
        Ok(session) if !session.token.access_token.is_empty() => {
            observer.enter(RunState::Authenticated).await;
            Ok(session)
        }
        Ok(_) => {
            observer.enter(RunState::Aborted).await;
            Err(PipelineError::Authorization(
                "no access token was issued".to_string(),
            ))
        }
        Err(e) => {
            observer.enter(RunState::Aborted).await;
            Err(e)
        }
    }
}

/// Generation, resolution and publishing for an authenticated session.
pub struct Pipeline {
    chat: Arc<dyn ChatModel>,
    catalog: Arc<dyn MusicCatalog>,
    model: String,
}

impl Pipeline {
    pub fn new(
        chat: Arc<dyn ChatModel>,
        catalog: Arc<dyn MusicCatalog>,
        model: impl Into<String>,
    ) -> Self {
        Pipeline {
            chat,
            catalog,
            model: model.into(),
        }
    }

    /// Runs one submission from AwaitingInput to a terminal state.
    ///
    /// An empty vibe returns [`RunOutcome::AwaitingInput`] without contacting
    /// either service. Any error moves the run to Aborted and is returned.
    pub async fn run(
        &self,
        preference: &UserPreference,
        observer: &dyn StageObserver,
    ) -> Result<RunOutcome, PipelineError> {
        observer.enter(RunState::AwaitingInput).await;
        if !preference.is_submitted() {
            return Ok(RunOutcome::AwaitingInput);
        }

        match self.run_submitted(preference, observer).await {
            Ok(published) => {
                observer.enter(RunState::Done).await;
                Ok(RunOutcome::Done(published))
            }
            Err(e) => {
                observer.enter(RunState::Aborted).await;
                Err(e)
            }
        }
    }

    async fn run_submitted(
        &self,
        preference: &UserPreference,
        observer: &dyn StageObserver,
    ) -> Result<PublishedPlaylist, PipelineError> {
        observer.enter(RunState::Generating).await;
        let response = generator::generate(self.chat.as_ref(), &self.model, preference).await?;

        observer.enter(RunState::Resolving).await;
        let resolved = resolver::resolve(self.catalog.as_ref(), &response)
            .await?
            .ok_or(PipelineError::EmptyPlaylist)?;

        observer.enter(RunState::Publishing).await;
        publisher::publish(self.catalog.as_ref(), resolved).await
    }
}
