use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::{
    config::Config,
    error, pipeline,
    server::{self, AppState},
    spotify::{Session, auth::BrowserAuthorizer},
    success,
};

/// Binds the local server, spawns it and runs the consent flow against it.
///
/// Exits the process when the server cannot start or authorization fails;
/// nothing else is attempted without a token.
pub async fn authorize_with_local_server(
    config: Arc<Config>,
) -> (AppState, JoinHandle<Result<(), String>>, Session) {
    let state = AppState::new(Arc::clone(&config));

    let listener = match server::bind(config.server_addr).await {
        Ok(listener) => listener,
        Err(e) => error!("{}", e),
    };

    let server_state = state.clone();
    let handle =
        tokio::spawn(async move { server::start_api_server(listener, server_state).await });

    let authorizer = BrowserAuthorizer::new(Arc::clone(&config), Arc::clone(&state.auth));
    let session = match pipeline::authenticate(&authorizer, &pipeline::Silent).await {
        Ok(session) => session,
        Err(e) => error!("{}", e),
    };

    success!("Authentication successful!");
    (state, handle, session)
}
