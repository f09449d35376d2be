use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{session::authorize_with_local_server, spinner::StageSpinner},
    config::Config,
    error,
    openai::OpenAiClient,
    pipeline::{Pipeline, RunOutcome},
    success,
    types::UserPreference,
    utils, warning,
};

/// One terminal run: authorize, generate, resolve, publish, print the link.
pub async fn generate(vibe: String, count: u32) {
    let preference = UserPreference::new(vibe, count);
    if !preference.is_submitted() {
        warning!("Nothing to generate: the vibe is empty.");
        return;
    }

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => error!("{}", e),
    };

    let (_state, server, session) = authorize_with_local_server(Arc::clone(&config)).await;
    // the callback route is no longer needed
    server.abort();

    let chat = Arc::new(OpenAiClient::new(
        config.openai_api_url.clone(),
        config.openai_api_key.clone(),
    ));
    let pipeline = Pipeline::new(chat, session.catalog, config.openai_model.clone());

    match pipeline.run(&preference, &StageSpinner::new()).await {
        Ok(RunOutcome::Done(playlist)) => {
            println!("{}", Table::new(utils::track_table_rows(&playlist.tracks)));
            success!("Playlist \"{}\" created.", playlist.name);
            success!("Playlist Created. Click Here: {}", playlist.external_url);
        }
        Ok(RunOutcome::AwaitingInput) => warning!("Nothing to generate: the vibe is empty."),
        Err(e) => error!("{}", e),
    }
}
