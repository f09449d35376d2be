use std::sync::Arc;

use crate::{
    cli::session::authorize_with_local_server,
    config::Config,
    error, info,
    openai::OpenAiClient,
    pipeline::Pipeline,
    warning,
};

/// Authorizes, then serves the preference form until the process is stopped.
pub async fn serve(open_page: bool) {
    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => error!("{}", e),
    };

    let (state, server, session) = authorize_with_local_server(Arc::clone(&config)).await;

    let chat = Arc::new(OpenAiClient::new(
        config.openai_api_url.clone(),
        config.openai_api_key.clone(),
    ));
    let _ = state.pipeline.set(Pipeline::new(
        chat,
        session.catalog,
        config.openai_model.clone(),
    ));

    let page_url = config.page_url();
    info!("Preference form ready at {}", page_url);
    if open_page && webbrowser::open(&page_url).is_err() {
        warning!("Failed to open browser. Please open {} manually.", page_url);
    }

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Server stopped: {}", e),
        Err(e) => error!("Server task failed: {}", e),
    }
}
