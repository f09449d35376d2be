use std::{env, sync::Arc};

use tabled::Table;

use crate::{
    cli::session::authorize_with_local_server,
    config::{self, Config},
    error, info, success,
    types::ConfigTableRow,
    utils::mask_secret,
    warning,
};

/// Prints the configuration with secrets masked.
///
/// With `authorize`, also runs the consent flow and shows the (masked) access
/// token and granted scope.
pub async fn check_config(authorize: bool) {
    let secrets = [
        config::SPOTIFY_CLIENT_ID,
        config::SPOTIFY_CLIENT_SECRET,
        config::OPENAI_API_KEY,
    ];

    let mut rows: Vec<ConfigTableRow> = secrets
        .iter()
        .map(|var| ConfigTableRow {
            variable: var.to_string(),
            value: match env::var(var) {
                Ok(v) if !v.trim().is_empty() => mask_secret(v.trim()),
                _ => "<missing>".to_string(),
            },
        })
        .collect();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("{}", Table::new(rows));
            error!("{}", e);
        }
    };

    rows.extend([
        ConfigTableRow {
            variable: "redirect uri".to_string(),
            value: config.redirect_uri.clone(),
        },
        ConfigTableRow {
            variable: "server address".to_string(),
            value: config.server_addr.to_string(),
        },
        ConfigTableRow {
            variable: "chat model".to_string(),
            value: config.openai_model.clone(),
        },
        ConfigTableRow {
            variable: "chat endpoint".to_string(),
            value: config.openai_api_url.clone(),
        },
        ConfigTableRow {
            variable: "spotify api".to_string(),
            value: config.spotify_api_url.clone(),
        },
    ]);
    println!("{}", Table::new(rows));
    success!("Configuration complete.");

    if !authorize {
        return;
    }

    info!("Checking Spotify authorization...");
    let (_state, server, session) = authorize_with_local_server(Arc::new(config)).await;
    server.abort();

    info!(
        "Your Spotify access token is: {}",
        mask_secret(&session.token.access_token)
    );
    info!(
        "Token expires at {}",
        session.token.expires_at().format("%Y-%m-%d %H:%M:%S UTC")
    );
    if session.token.scope.is_empty() {
        warning!("Spotify did not report the granted scope.");
    } else {
        info!("Granted scope: {}", session.token.scope);
    }
}
